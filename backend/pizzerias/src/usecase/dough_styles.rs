use uuid::Uuid;

use crate::domain::dough_style::{DoughStyle, DoughStyleTag, TagStatus};
use crate::usecase::contracts::{DoughStyleRepository, PizzeriaRepository};
use crate::usecase::error::UsecaseError;

pub struct DoughStylesUseCase<D, P>
where
    D: DoughStyleRepository,
    P: PizzeriaRepository,
{
    style_repository: D,
    pizzeria_repository: P,
}

impl<D, P> DoughStylesUseCase<D, P>
where
    D: DoughStyleRepository,
    P: PizzeriaRepository,
{
    pub fn new(style_repository: D, pizzeria_repository: P) -> Self {
        Self {
            style_repository,
            pizzeria_repository,
        }
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id))]
    pub async fn list_approved(&self, pizzeria_id: Uuid) -> Result<Vec<DoughStyleTag>, UsecaseError> {
        tracing::debug!("listing approved dough styles");

        let tags = self
            .style_repository
            .find_by_pizzeria_and_status(pizzeria_id, TagStatus::Approved)
            .await?;

        Ok(tags)
    }

    /// Creates a pending tag, or returns the existing tag for the same style.
    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, user_id = %user_id, style = %style))]
    pub async fn suggest(
        &self,
        pizzeria_id: Uuid,
        user_id: Uuid,
        style: DoughStyle,
    ) -> Result<DoughStyleTag, UsecaseError> {
        tracing::debug!("suggesting dough style");

        self.pizzeria_repository
            .find_by_id(pizzeria_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Pizzeria".to_string()))?;

        if let Some(existing) = self
            .style_repository
            .find_by_pizzeria_and_style(pizzeria_id, style)
            .await?
        {
            tracing::debug!(tag_id = %existing.id, status = ?existing.status, "style already suggested");
            return Ok(existing);
        }

        let tag = DoughStyleTag::suggest(pizzeria_id, style, user_id);
        self.style_repository.create(&tag).await?;

        tracing::info!(tag_id = %tag.id, "dough style suggested");
        Ok(tag)
    }

    #[tracing::instrument(skip(self), fields(tag_id = %tag_id, upvote))]
    pub async fn vote(&self, tag_id: Uuid, upvote: bool) -> Result<DoughStyleTag, UsecaseError> {
        tracing::debug!("voting on dough style");

        let tag = self
            .style_repository
            .record_vote(tag_id, upvote)
            .await
            .map_err(|e| match UsecaseError::from(e) {
                UsecaseError::NotFound(_) => UsecaseError::NotFound("Style tag".to_string()),
                other => other,
            })?;

        tracing::debug!(upvotes = tag.upvotes, downvotes = tag.downvotes, "vote recorded");
        Ok(tag)
    }

    /// Approving a tag adds the style to the pizzeria's style list and
    /// withdrawing an approval removes it again.
    #[tracing::instrument(skip(self), fields(tag_id = %tag_id, status = ?status))]
    pub async fn moderate(&self, tag_id: Uuid, status: TagStatus) -> Result<DoughStyleTag, UsecaseError> {
        tracing::debug!("moderating dough style");

        let tag = self
            .style_repository
            .find_by_id(tag_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Style tag".to_string()))?;

        let change = tag.cuisine_change(status);
        let updated = self.style_repository.moderate(&tag, status, change).await?;

        tracing::info!(
            tag_id = %tag_id,
            pizzeria_id = %updated.pizzeria_id,
            previous = ?tag.status,
            change = ?change,
            "dough style moderated"
        );
        Ok(updated)
    }
}
