use uuid::Uuid;

use crate::domain::geo::{haversine_miles, Coordinates};
use crate::domain::pizzeria::NearbyPizzeria;
use crate::domain::saved::SavedPizzeria;
use crate::usecase::contracts::{PizzeriaRepository, SavedPizzeriaRepository};
use crate::usecase::error::UsecaseError;

pub struct SavedUseCase<S, P>
where
    S: SavedPizzeriaRepository,
    P: PizzeriaRepository,
{
    saved_repository: S,
    pizzeria_repository: P,
}

impl<S, P> SavedUseCase<S, P>
where
    S: SavedPizzeriaRepository,
    P: PizzeriaRepository,
{
    pub fn new(saved_repository: S, pizzeria_repository: P) -> Self {
        Self {
            saved_repository,
            pizzeria_repository,
        }
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, user_id = %user_id))]
    pub async fn save(&self, pizzeria_id: Uuid, user_id: Uuid) -> Result<(), UsecaseError> {
        tracing::debug!("saving pizzeria");

        self.pizzeria_repository
            .find_by_id(pizzeria_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Pizzeria".to_string()))?;

        if self.saved_repository.exists(user_id, pizzeria_id).await? {
            tracing::debug!("pizzeria already saved");
            return Ok(());
        }

        let saved = SavedPizzeria::new(user_id, pizzeria_id);
        self.saved_repository.create(&saved).await?;

        tracing::info!(pizzeria_id = %pizzeria_id, user_id = %user_id, "pizzeria saved");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, user_id = %user_id))]
    pub async fn unsave(&self, pizzeria_id: Uuid, user_id: Uuid) -> Result<(), UsecaseError> {
        tracing::debug!("removing saved pizzeria");

        self.saved_repository.delete(user_id, pizzeria_id).await?;

        tracing::info!(pizzeria_id = %pizzeria_id, user_id = %user_id, "saved pizzeria removed");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, user_id = %user_id))]
    pub async fn is_saved(&self, pizzeria_id: Uuid, user_id: Uuid) -> Result<bool, UsecaseError> {
        Ok(self.saved_repository.exists(user_id, pizzeria_id).await?)
    }

    /// Saved pizzerias, nearest first when `from` is given, otherwise
    /// newest first.
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_saved(
        &self,
        user_id: Uuid,
        from: Option<Coordinates>,
    ) -> Result<Vec<NearbyPizzeria>, UsecaseError> {
        tracing::debug!("listing saved pizzerias");

        if from.is_some_and(|c| !c.is_valid()) {
            return Err(UsecaseError::Validation("Invalid coordinates".to_string()));
        }

        let pizzerias = self.saved_repository.find_pizzerias_by_user(user_id).await?;

        let mut listed: Vec<NearbyPizzeria> = pizzerias
            .into_iter()
            .map(|pizzeria| NearbyPizzeria {
                distance_miles: from
                    .map(|origin| haversine_miles(origin, pizzeria.coordinates()))
                    .unwrap_or(0.0),
                pizzeria,
            })
            .collect();
        if from.is_some() {
            listed.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
        }

        tracing::debug!(user_id = %user_id, count = listed.len(), "saved pizzerias listed");
        Ok(listed)
    }
}
