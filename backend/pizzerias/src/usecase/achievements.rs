use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::achievement::{
    AchievementProgress, AchievementType, ReviewStats, UserAchievement,
};
use crate::usecase::contracts::{AchievementRepository, RatingRepository, UserLocationRepository};
use crate::usecase::error::UsecaseError;

pub struct AchievementsUseCase<A, Ra, L>
where
    A: AchievementRepository,
    Ra: RatingRepository,
    L: UserLocationRepository,
{
    achievement_repository: A,
    rating_repository: Ra,
    location_repository: L,
}

impl<A, Ra, L> AchievementsUseCase<A, Ra, L>
where
    A: AchievementRepository,
    Ra: RatingRepository,
    L: UserLocationRepository,
{
    pub fn new(achievement_repository: A, rating_repository: Ra, location_repository: L) -> Self {
        Self {
            achievement_repository,
            rating_repository,
            location_repository,
        }
    }

    async fn load_stats(&self, user_id: Uuid) -> Result<ReviewStats, UsecaseError> {
        let history = self.rating_repository.find_history_by_user(user_id).await?;
        // local expert is evaluated against the location stored now, not at review time
        let home = self
            .location_repository
            .find_by_user(user_id)
            .await?
            .map(|l| l.coordinates());

        Ok(ReviewStats::compute(&history, home))
    }

    /// Awards every achievement the user newly qualifies for and returns
    /// them. Types already earned are never re-checked.
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn evaluate(&self, user_id: Uuid) -> Result<Vec<AchievementType>, UsecaseError> {
        tracing::debug!("evaluating achievements");

        let earned: Vec<AchievementType> = self
            .achievement_repository
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|a| a.achievement_type)
            .collect();

        let pending: Vec<AchievementType> = AchievementType::ALL
            .into_iter()
            .filter(|t| !earned.contains(t))
            .collect();
        if pending.is_empty() {
            tracing::debug!("all achievements already earned");
            return Ok(vec![]);
        }

        let stats = self.load_stats(user_id).await?;
        tracing::debug!(?stats, "review stats computed");

        let mut awarded = Vec::new();
        for achievement_type in pending {
            if !achievement_type.is_satisfied(&stats) {
                continue;
            }

            let record = UserAchievement::new(user_id, achievement_type);
            match self.achievement_repository.create(&record).await {
                Ok(true) => {
                    metrics::counter!("achievements_awarded_total", "type" => achievement_type.as_str())
                        .increment(1);
                    tracing::info!(user_id = %user_id, achievement = %achievement_type, "achievement earned");
                    awarded.push(achievement_type);
                }
                Ok(false) => {
                    tracing::debug!(achievement = %achievement_type, "achievement recorded concurrently, skipping");
                }
                Err(e) => {
                    tracing::error!(error = %e, achievement = %achievement_type, "failed to record achievement");
                }
            }
        }

        Ok(awarded)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_progress(&self, user_id: Uuid) -> Result<Vec<AchievementProgress>, UsecaseError> {
        tracing::debug!("listing achievement progress");

        let earned: HashMap<AchievementType, UserAchievement> = self
            .achievement_repository
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|a| (a.achievement_type, a))
            .collect();
        let stats = self.load_stats(user_id).await?;

        let progress = AchievementType::ALL
            .into_iter()
            .map(|t| {
                let record = earned.get(&t);
                AchievementProgress {
                    achievement_type: t,
                    title: t.title(),
                    earned: record.is_some(),
                    earned_at: record.map(|r| r.earned_at),
                    current: t.progress(&stats).min(t.target()),
                    target: t.target(),
                }
            })
            .collect();

        Ok(progress)
    }
}
