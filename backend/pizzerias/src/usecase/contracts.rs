use uuid::Uuid;

use crate::domain::achievement::{ReviewHistoryEntry, UserAchievement};
use crate::domain::dough_style::{CuisineStyleChange, DoughStyle, DoughStyleTag, TagStatus};
use crate::domain::geo::{BoundingBox, Coordinates};
use crate::domain::pizzeria::{DiscoveredPlace, Pizzeria};
use crate::domain::rating::PizzeriaRating;
use crate::domain::saved::SavedPizzeria;
use crate::domain::user::UserLocation;
use crate::repository::errors::RepositoryError;
use crate::usecase::overpass::PlaceSearchError;

#[cfg_attr(test, mockall::automock)]
pub trait PizzeriaRepository: Send + Sync {
    async fn create(&self, pizzeria: &Pizzeria) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Pizzeria>, RepositoryError>;
    /// Nearest to `center` first, at most `limit` rows.
    async fn find_in_bounds(
        &self,
        bounds: &BoundingBox,
        center: Coordinates,
        limit: i64,
    ) -> Result<Vec<Pizzeria>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait RatingRepository: Send + Sync {
    /// Returns the stored row; on conflict it keeps the original id and created_at.
    async fn upsert(&self, rating: &PizzeriaRating) -> Result<PizzeriaRating, RepositoryError>;
    async fn delete_by_pizzeria_and_user(
        &self,
        pizzeria_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), RepositoryError>;
    async fn find_by_pizzeria_and_user(
        &self,
        pizzeria_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<PizzeriaRating>, RepositoryError>;
    async fn find_by_pizzeria_id(
        &self,
        pizzeria_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PizzeriaRating>, RepositoryError>;
    /// Returns (average overall, average crust, count).
    async fn get_aggregate(&self, pizzeria_id: Uuid) -> Result<(f64, f64, i64), RepositoryError>;
    async fn find_history_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ReviewHistoryEntry>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait DoughStyleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DoughStyleTag>, RepositoryError>;
    async fn find_by_pizzeria_and_style(
        &self,
        pizzeria_id: Uuid,
        style: DoughStyle,
    ) -> Result<Option<DoughStyleTag>, RepositoryError>;
    async fn find_by_pizzeria_and_status(
        &self,
        pizzeria_id: Uuid,
        status: TagStatus,
    ) -> Result<Vec<DoughStyleTag>, RepositoryError>;
    async fn create(&self, tag: &DoughStyleTag) -> Result<(), RepositoryError>;
    async fn record_vote(&self, id: Uuid, upvote: bool) -> Result<DoughStyleTag, RepositoryError>;
    /// Sets the status and applies `change` to the pizzeria in one transaction.
    /// Fails with `Conflict` if the stored status no longer matches `tag.status`.
    async fn moderate(
        &self,
        tag: &DoughStyleTag,
        status: TagStatus,
        change: Option<CuisineStyleChange>,
    ) -> Result<DoughStyleTag, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait SavedPizzeriaRepository: Send + Sync {
    async fn create(&self, saved: &SavedPizzeria) -> Result<(), RepositoryError>;
    async fn delete(&self, user_id: Uuid, pizzeria_id: Uuid) -> Result<(), RepositoryError>;
    async fn exists(&self, user_id: Uuid, pizzeria_id: Uuid) -> Result<bool, RepositoryError>;
    /// Newest first.
    async fn find_pizzerias_by_user(&self, user_id: Uuid) -> Result<Vec<Pizzeria>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait AchievementRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserAchievement>, RepositoryError>;
    /// Returns `false` when the user already holds this achievement type.
    async fn create(&self, achievement: &UserAchievement) -> Result<bool, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait UserLocationRepository: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserLocation>, RepositoryError>;
    async fn upsert(&self, location: &UserLocation) -> Result<(), RepositoryError>;
}

/// Third-party place search used to supplement the local cache.
#[cfg_attr(test, mockall::automock)]
pub trait PlaceSearch: Send + Sync {
    async fn search_nearby(
        &self,
        center: Coordinates,
        radius_miles: f64,
    ) -> Result<Vec<DiscoveredPlace>, PlaceSearchError>;
}
