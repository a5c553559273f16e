use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::geo::{haversine_miles, Coordinates};

pub const LOCAL_EXPERT_RADIUS_MILES: f64 = 10.0;
pub const LOCAL_EXPERT_MIN_REVIEWS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    ReviewCount,
    DistinctPlaces,
    PhotoReviews,
    DistinctStyles,
    ConsecutiveDays,
    LocalExpert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "achievement_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AchievementType {
    FirstReview,
    FiveReviews,
    TwentyFiveReviews,
    Explorer,
    PhotoReviewer,
    StyleSampler,
    StyleMaster,
    StreakThree,
    StreakSeven,
    LocalExpert,
}

impl AchievementType {
    pub const ALL: [AchievementType; 10] = [
        AchievementType::FirstReview,
        AchievementType::FiveReviews,
        AchievementType::TwentyFiveReviews,
        AchievementType::Explorer,
        AchievementType::PhotoReviewer,
        AchievementType::StyleSampler,
        AchievementType::StyleMaster,
        AchievementType::StreakThree,
        AchievementType::StreakSeven,
        AchievementType::LocalExpert,
    ];

    pub fn criterion(&self) -> Criterion {
        match self {
            AchievementType::FirstReview
            | AchievementType::FiveReviews
            | AchievementType::TwentyFiveReviews => Criterion::ReviewCount,
            AchievementType::Explorer => Criterion::DistinctPlaces,
            AchievementType::PhotoReviewer => Criterion::PhotoReviews,
            AchievementType::StyleSampler | AchievementType::StyleMaster => {
                Criterion::DistinctStyles
            }
            AchievementType::StreakThree | AchievementType::StreakSeven => {
                Criterion::ConsecutiveDays
            }
            AchievementType::LocalExpert => Criterion::LocalExpert,
        }
    }

    pub fn target(&self) -> u32 {
        match self {
            AchievementType::FirstReview => 1,
            AchievementType::FiveReviews => 5,
            AchievementType::TwentyFiveReviews => 25,
            AchievementType::Explorer => 10,
            AchievementType::PhotoReviewer => 5,
            AchievementType::StyleSampler => 3,
            AchievementType::StyleMaster => 6,
            AchievementType::StreakThree => 3,
            AchievementType::StreakSeven => 7,
            AchievementType::LocalExpert => LOCAL_EXPERT_MIN_REVIEWS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementType::FirstReview => "first_review",
            AchievementType::FiveReviews => "five_reviews",
            AchievementType::TwentyFiveReviews => "twenty_five_reviews",
            AchievementType::Explorer => "explorer",
            AchievementType::PhotoReviewer => "photo_reviewer",
            AchievementType::StyleSampler => "style_sampler",
            AchievementType::StyleMaster => "style_master",
            AchievementType::StreakThree => "streak_three",
            AchievementType::StreakSeven => "streak_seven",
            AchievementType::LocalExpert => "local_expert",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AchievementType::FirstReview => "First Slice",
            AchievementType::FiveReviews => "Regular",
            AchievementType::TwentyFiveReviews => "Pizza Critic",
            AchievementType::Explorer => "Explorer",
            AchievementType::PhotoReviewer => "Food Photographer",
            AchievementType::StyleSampler => "Style Sampler",
            AchievementType::StyleMaster => "Style Master",
            AchievementType::StreakThree => "On a Roll",
            AchievementType::StreakSeven => "Pizza Week",
            AchievementType::LocalExpert => "Local Expert",
        }
    }

    /// Current value of this achievement's metric, used for progress display.
    pub fn progress(&self, stats: &ReviewStats) -> u32 {
        match self.criterion() {
            Criterion::ReviewCount => stats.review_count,
            Criterion::DistinctPlaces => stats.distinct_places,
            Criterion::PhotoReviews => stats.photo_reviews,
            Criterion::DistinctStyles => stats.distinct_styles,
            Criterion::ConsecutiveDays => stats.longest_day_streak,
            Criterion::LocalExpert => stats.local_reviews.unwrap_or(0),
        }
    }

    pub fn is_satisfied(&self, stats: &ReviewStats) -> bool {
        match self.criterion() {
            Criterion::LocalExpert => stats.is_local_expert(),
            _ => self.progress(stats) >= self.target(),
        }
    }
}

impl fmt::Display for AchievementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAchievement {
    pub id: Uuid,
    pub user_id: Uuid,
    pub achievement_type: AchievementType,
    pub earned_at: DateTime<Utc>,
}

impl UserAchievement {
    pub fn new(user_id: Uuid, achievement_type: AchievementType) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            achievement_type,
            earned_at: Utc::now(),
        }
    }
}

/// One reviewed place joined with the attributes needed for aggregation.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ReviewHistoryEntry {
    pub pizzeria_id: Uuid,
    pub has_photos: bool,
    pub cuisine_styles: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub reviewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewStats {
    pub review_count: u32,
    pub distinct_places: u32,
    pub photo_reviews: u32,
    pub distinct_styles: u32,
    pub longest_day_streak: u32,
    /// Reviews within [`LOCAL_EXPERT_RADIUS_MILES`] of the stored location;
    /// `None` when the user has no stored location.
    pub local_reviews: Option<u32>,
}

impl ReviewStats {
    pub fn compute(history: &[ReviewHistoryEntry], home: Option<Coordinates>) -> Self {
        let distinct_places: HashSet<Uuid> = history.iter().map(|e| e.pizzeria_id).collect();
        let distinct_styles: HashSet<&str> = history
            .iter()
            .flat_map(|e| e.cuisine_styles.iter().map(String::as_str))
            .collect();
        let photo_reviews = history.iter().filter(|e| e.has_photos).count();
        let days: Vec<NaiveDate> = history.iter().map(|e| e.reviewed_at.date_naive()).collect();

        let local_reviews = home.map(|home| {
            let count = history
                .iter()
                .filter(|e| {
                    haversine_miles(home, Coordinates::new(e.latitude, e.longitude))
                        <= LOCAL_EXPERT_RADIUS_MILES
                })
                .count();
            saturating_u32(count)
        });

        Self {
            review_count: saturating_u32(history.len()),
            distinct_places: saturating_u32(distinct_places.len()),
            photo_reviews: saturating_u32(photo_reviews),
            distinct_styles: saturating_u32(distinct_styles.len()),
            longest_day_streak: longest_day_streak(&days),
            local_reviews,
        }
    }

    pub fn is_local_expert(&self) -> bool {
        self.local_reviews
            .is_some_and(|count| count >= LOCAL_EXPERT_MIN_REVIEWS)
    }
}

/// Longest run of calendar days, walking backward from the most recent, in
/// which each day is exactly one day before the previous one. Several
/// reviews on the same day count once.
pub fn longest_day_streak(days: &[NaiveDate]) -> u32 {
    let mut distinct: Vec<NaiveDate> = days.to_vec();
    distinct.sort_unstable_by(|a, b| b.cmp(a));
    distinct.dedup();

    let Some(first) = distinct.first() else {
        return 0;
    };

    let mut longest = 1u32;
    let mut current = 1u32;
    let mut previous = *first;
    for day in distinct.iter().skip(1) {
        if previous.signed_duration_since(*day).num_days() == 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
        previous = *day;
    }

    longest
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementProgress {
    pub achievement_type: AchievementType,
    pub title: &'static str,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
    pub current: u32,
    pub target: u32,
}
