use serde::Serialize;
use uuid::Uuid;

use crate::domain::dough_style::{DoughStyle, TagStatus};
use crate::domain::pizzeria::{Pizzeria, PizzeriaSubmission};
use crate::usecase::contracts::{DoughStyleRepository, PizzeriaRepository, RatingRepository};
use crate::usecase::error::UsecaseError;

#[derive(Debug, Clone, Serialize)]
pub struct PizzeriaDetails {
    #[serde(flatten)]
    pub pizzeria: Pizzeria,
    pub average_overall: f64,
    pub average_crust: f64,
    pub ratings_count: i64,
    pub dough_styles: Vec<DoughStyle>,
}

pub struct PizzeriasUseCase<P, Ra, D>
where
    P: PizzeriaRepository,
    Ra: RatingRepository,
    D: DoughStyleRepository,
{
    pizzeria_repository: P,
    rating_repository: Ra,
    style_repository: D,
}

impl<P, Ra, D> PizzeriasUseCase<P, Ra, D>
where
    P: PizzeriaRepository,
    Ra: RatingRepository,
    D: DoughStyleRepository,
{
    pub fn new(pizzeria_repository: P, rating_repository: Ra, style_repository: D) -> Self {
        Self {
            pizzeria_repository,
            rating_repository,
            style_repository,
        }
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %id))]
    pub async fn get_pizzeria(&self, id: Uuid) -> Result<PizzeriaDetails, UsecaseError> {
        tracing::debug!("getting pizzeria");

        let pizzeria = self
            .pizzeria_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Pizzeria".to_string()))?;

        let (average_overall, average_crust, ratings_count) =
            self.rating_repository.get_aggregate(id).await?;
        let dough_styles = self
            .style_repository
            .find_by_pizzeria_and_status(id, TagStatus::Approved)
            .await?
            .into_iter()
            .map(|tag| tag.style)
            .collect();

        Ok(PizzeriaDetails {
            pizzeria,
            average_overall,
            average_crust,
            ratings_count,
            dough_styles,
        })
    }

    #[tracing::instrument(skip(self, submission), fields(user_id = %user_id, name = %submission.name))]
    pub async fn submit_pizzeria(
        &self,
        user_id: Uuid,
        submission: PizzeriaSubmission,
    ) -> Result<Pizzeria, UsecaseError> {
        tracing::debug!("submitting pizzeria");

        if !submission.location.is_valid() {
            return Err(UsecaseError::Validation("Invalid coordinates".to_string()));
        }

        let pizzeria = Pizzeria::new_submission(submission, user_id);
        self.pizzeria_repository.create(&pizzeria).await?;

        tracing::info!(pizzeria_id = %pizzeria.id, "pizzeria submitted");
        Ok(pizzeria)
    }
}
