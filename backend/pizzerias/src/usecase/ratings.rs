use uuid::Uuid;

use crate::domain::rating::{PizzeriaRating, RatingInfo, RatingSubmission};
use crate::usecase::contracts::{PizzeriaRepository, RatingRepository};
use crate::usecase::error::UsecaseError;

pub const MAX_REVIEWS_PAGE: i64 = 100;

pub struct RatingsUseCase<Ra, P>
where
    Ra: RatingRepository,
    P: PizzeriaRepository,
{
    rating_repository: Ra,
    pizzeria_repository: P,
}

impl<Ra, P> RatingsUseCase<Ra, P>
where
    Ra: RatingRepository,
    P: PizzeriaRepository,
{
    pub fn new(rating_repository: Ra, pizzeria_repository: P) -> Self {
        Self {
            rating_repository,
            pizzeria_repository,
        }
    }

    #[tracing::instrument(skip(self, submission), fields(pizzeria_id = %pizzeria_id, user_id = %user_id, overall = submission.overall, crust = submission.crust))]
    pub async fn submit_rating(
        &self,
        pizzeria_id: Uuid,
        user_id: Uuid,
        submission: RatingSubmission,
    ) -> Result<PizzeriaRating, UsecaseError> {
        tracing::debug!("submitting rating");

        submission.validate().map_err(UsecaseError::Validation)?;

        self.pizzeria_repository
            .find_by_id(pizzeria_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Pizzeria".to_string()))?;

        let rating = self
            .rating_repository
            .upsert(&PizzeriaRating::new(pizzeria_id, user_id, submission))
            .await?;

        metrics::counter!("ratings_submitted_total").increment(1);
        tracing::info!(pizzeria_id = %pizzeria_id, user_id = %user_id, "rating submitted successfully");
        Ok(rating)
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id, user_id = %user_id))]
    pub async fn remove_rating(&self, pizzeria_id: Uuid, user_id: Uuid) -> Result<(), UsecaseError> {
        tracing::debug!("removing rating");

        self.rating_repository
            .delete_by_pizzeria_and_user(pizzeria_id, user_id)
            .await
            .map_err(|e| match UsecaseError::from(e) {
                UsecaseError::NotFound(_) => UsecaseError::NotFound("Rating".to_string()),
                other => other,
            })?;

        tracing::info!(pizzeria_id = %pizzeria_id, user_id = %user_id, "rating removed successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id))]
    pub async fn get_rating_info(
        &self,
        pizzeria_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<RatingInfo, UsecaseError> {
        tracing::debug!("getting rating info");

        let (average_overall, average_crust, count) =
            self.rating_repository.get_aggregate(pizzeria_id).await?;

        let user_rating = if let Some(uid) = user_id {
            self.rating_repository
                .find_by_pizzeria_and_user(pizzeria_id, uid)
                .await?
        } else {
            None
        };

        tracing::debug!(pizzeria_id = %pizzeria_id, average_overall, average_crust, count, "rating info retrieved");
        Ok(RatingInfo {
            average_overall,
            average_crust,
            count,
            user_rating,
        })
    }

    #[tracing::instrument(skip(self), fields(pizzeria_id = %pizzeria_id))]
    pub async fn list_reviews(
        &self,
        pizzeria_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<PizzeriaRating>, UsecaseError> {
        tracing::debug!("listing reviews");

        let limit = limit.unwrap_or(20).clamp(1, MAX_REVIEWS_PAGE);
        let offset = offset.unwrap_or(0).max(0);

        let reviews = self
            .rating_repository
            .find_by_pizzeria_id(pizzeria_id, limit, offset)
            .await?;

        tracing::debug!(pizzeria_id = %pizzeria_id, count = reviews.len(), "reviews listed");
        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::domain::pizzeria::sample_pizzeria;
    use crate::repository::errors::RepositoryError;
    use crate::usecase::contracts::{MockPizzeriaRepository, MockRatingRepository};

    fn submission(overall: i16, crust: i16) -> RatingSubmission {
        RatingSubmission {
            overall,
            crust,
            review: Some("Leopard-spotted crust".to_string()),
            photos: vec![],
        }
    }

    fn existing_pizzeria(repo: &mut MockPizzeriaRepository, pizzeria_id: Uuid) {
        repo.expect_find_by_id()
            .with(mockall::predicate::eq(pizzeria_id))
            .returning(|id| {
                let mut p = sample_pizzeria(40.0, -74.0);
                p.id = id;
                Ok(Some(p))
            });
    }

    #[tokio::test]
    async fn test_submit_rating_success() {
        let mut mock_rating_repo = MockRatingRepository::new();
        let mut mock_pizzeria_repo = MockPizzeriaRepository::new();
        let pizzeria_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        existing_pizzeria(&mut mock_pizzeria_repo, pizzeria_id);
        mock_rating_repo
            .expect_upsert()
            .times(1)
            .returning(|rating| Ok(rating.clone()));

        let usecase = RatingsUseCase::new(mock_rating_repo, mock_pizzeria_repo);
        let rating = usecase
            .submit_rating(pizzeria_id, user_id, submission(4, 5))
            .await
            .unwrap();

        assert_eq!(rating.pizzeria_id, pizzeria_id);
        assert_eq!(rating.user_id, user_id);
        assert_eq!(rating.overall, 4);
        assert_eq!(rating.crust, 5);
    }

    #[tokio::test]
    async fn test_submit_rating_out_of_range_touches_nothing() {
        for (overall, crust) in [(0, 3), (6, 3), (3, 0), (3, 6), (-2, 9)] {
            let mut mock_rating_repo = MockRatingRepository::new();
            let mut mock_pizzeria_repo = MockPizzeriaRepository::new();
            mock_rating_repo.expect_upsert().times(0);
            mock_pizzeria_repo.expect_find_by_id().times(0);

            let usecase = RatingsUseCase::new(mock_rating_repo, mock_pizzeria_repo);
            let result = usecase
                .submit_rating(Uuid::new_v4(), Uuid::new_v4(), submission(overall, crust))
                .await;

            match result {
                Err(UsecaseError::Validation(msg)) => assert!(msg.contains("between 1 and 5")),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_submit_rating_pizzeria_not_found() {
        let mut mock_rating_repo = MockRatingRepository::new();
        let mut mock_pizzeria_repo = MockPizzeriaRepository::new();
        let pizzeria_id = Uuid::new_v4();

        mock_pizzeria_repo
            .expect_find_by_id()
            .with(mockall::predicate::eq(pizzeria_id))
            .times(1)
            .returning(|_| Ok(None));
        mock_rating_repo.expect_upsert().times(0);

        let usecase = RatingsUseCase::new(mock_rating_repo, mock_pizzeria_repo);
        let result = usecase
            .submit_rating(pizzeria_id, Uuid::new_v4(), submission(3, 3))
            .await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_resubmission_replaces_previous_rating() {
        // in-memory stand-in for the (pizzeria_id, user_id) unique key
        let store: Arc<Mutex<Vec<PizzeriaRating>>> = Arc::new(Mutex::new(vec![]));
        let mut mock_rating_repo = MockRatingRepository::new();
        let mut mock_pizzeria_repo = MockPizzeriaRepository::new();
        let pizzeria_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        existing_pizzeria(&mut mock_pizzeria_repo, pizzeria_id);
        let upsert_store = Arc::clone(&store);
        mock_rating_repo
            .expect_upsert()
            .times(2)
            .returning(move |rating| {
                let mut rows = upsert_store.lock().unwrap();
                let existing = rows
                    .iter_mut()
                    .find(|r| r.pizzeria_id == rating.pizzeria_id && r.user_id == rating.user_id);
                let stored = match existing {
                    Some(row) => {
                        row.overall = rating.overall;
                        row.crust = rating.crust;
                        row.review = rating.review.clone();
                        row.photos = rating.photos.clone();
                        row.updated_at = rating.updated_at;
                        row.clone()
                    }
                    None => {
                        rows.push(rating.clone());
                        rating.clone()
                    }
                };
                Ok(stored)
            });

        let usecase = RatingsUseCase::new(mock_rating_repo, mock_pizzeria_repo);
        let first = usecase
            .submit_rating(pizzeria_id, user_id, submission(2, 2))
            .await
            .unwrap();
        let second = usecase
            .submit_rating(pizzeria_id, user_id, submission(5, 4))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        let rows = store.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].overall, 5);
        assert_eq!(rows[0].crust, 4);
    }

    #[tokio::test]
    async fn test_remove_rating_success() {
        let mut mock_rating_repo = MockRatingRepository::new();
        let mock_pizzeria_repo = MockPizzeriaRepository::new();
        let pizzeria_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        mock_rating_repo
            .expect_delete_by_pizzeria_and_user()
            .with(
                mockall::predicate::eq(pizzeria_id),
                mockall::predicate::eq(user_id),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let usecase = RatingsUseCase::new(mock_rating_repo, mock_pizzeria_repo);
        let result = usecase.remove_rating(pizzeria_id, user_id).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_remove_missing_rating() {
        let mut mock_rating_repo = MockRatingRepository::new();
        let mock_pizzeria_repo = MockPizzeriaRepository::new();

        mock_rating_repo
            .expect_delete_by_pizzeria_and_user()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let usecase = RatingsUseCase::new(mock_rating_repo, mock_pizzeria_repo);
        let result = usecase.remove_rating(Uuid::new_v4(), Uuid::new_v4()).await;

        assert_eq!(result.unwrap_err().to_string(), "Rating not found");
    }

    #[tokio::test]
    async fn test_get_rating_info_with_user() {
        let mut mock_rating_repo = MockRatingRepository::new();
        let mock_pizzeria_repo = MockPizzeriaRepository::new();
        let pizzeria_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        mock_rating_repo
            .expect_get_aggregate()
            .with(mockall::predicate::eq(pizzeria_id))
            .times(1)
            .returning(|_| Ok((4.2, 3.8, 10)));
        mock_rating_repo
            .expect_find_by_pizzeria_and_user()
            .with(
                mockall::predicate::eq(pizzeria_id),
                mockall::predicate::eq(user_id),
            )
            .times(1)
            .returning(|p, u| Ok(Some(PizzeriaRating::new(p, u, submission(5, 4)))));

        let usecase = RatingsUseCase::new(mock_rating_repo, mock_pizzeria_repo);
        let info = usecase
            .get_rating_info(pizzeria_id, Some(user_id))
            .await
            .unwrap();

        assert_eq!(info.average_overall, 4.2);
        assert_eq!(info.average_crust, 3.8);
        assert_eq!(info.count, 10);
        assert_eq!(info.user_rating.map(|r| r.overall), Some(5));
    }

    #[tokio::test]
    async fn test_get_rating_info_without_user() {
        let mut mock_rating_repo = MockRatingRepository::new();
        let mock_pizzeria_repo = MockPizzeriaRepository::new();
        let pizzeria_id = Uuid::new_v4();

        mock_rating_repo
            .expect_get_aggregate()
            .returning(|_| Ok((3.5, 3.0, 7)));
        mock_rating_repo.expect_find_by_pizzeria_and_user().times(0);

        let usecase = RatingsUseCase::new(mock_rating_repo, mock_pizzeria_repo);
        let info = usecase.get_rating_info(pizzeria_id, None).await.unwrap();

        assert_eq!(info.count, 7);
        assert!(info.user_rating.is_none());
    }

    #[tokio::test]
    async fn test_list_reviews_clamps_paging() {
        let mut mock_rating_repo = MockRatingRepository::new();
        let mock_pizzeria_repo = MockPizzeriaRepository::new();
        let pizzeria_id = Uuid::new_v4();

        mock_rating_repo
            .expect_find_by_pizzeria_id()
            .with(
                mockall::predicate::eq(pizzeria_id),
                mockall::predicate::eq(MAX_REVIEWS_PAGE),
                mockall::predicate::eq(0),
            )
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let usecase = RatingsUseCase::new(mock_rating_repo, mock_pizzeria_repo);
        let reviews = usecase
            .list_reviews(pizzeria_id, Some(1000), Some(-5))
            .await
            .unwrap();

        assert!(reviews.is_empty());
    }
}
