use uuid::Uuid;

use crate::domain::geo::Coordinates;
use crate::domain::user::UserLocation;
use crate::usecase::contracts::UserLocationRepository;
use crate::usecase::error::UsecaseError;

pub struct UsersUseCase<L>
where
    L: UserLocationRepository,
{
    location_repository: L,
}

impl<L> UsersUseCase<L>
where
    L: UserLocationRepository,
{
    pub fn new(location_repository: L) -> Self {
        Self { location_repository }
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn update_location(
        &self,
        user_id: Uuid,
        location: Coordinates,
    ) -> Result<UserLocation, UsecaseError> {
        tracing::debug!("updating user location");

        if !location.is_valid() {
            return Err(UsecaseError::Validation("Invalid coordinates".to_string()));
        }

        let stored = UserLocation::new(user_id, location);
        self.location_repository.upsert(&stored).await?;

        tracing::debug!(user_id = %user_id, "user location updated");
        Ok(stored)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_location(&self, user_id: Uuid) -> Result<UserLocation, UsecaseError> {
        self.location_repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Location".to_string()))
    }
}
