use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::achievement::AchievementType;
use crate::domain::rating::{PizzeriaRating, RatingSubmission};
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRatingRequest {
    #[validate(range(min = 1, max = 5))]
    pub overall: i16,
    #[validate(range(min = 1, max = 5))]
    pub crust: i16,
    #[validate(length(max = 2000))]
    pub review: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub photos: Vec<String>,
}

impl From<SubmitRatingRequest> for RatingSubmission {
    fn from(request: SubmitRatingRequest) -> Self {
        Self {
            overall: request.overall,
            crust: request.crust,
            review: request.review,
            photos: request.photos,
        }
    }
}

#[derive(Serialize)]
pub struct SubmitRatingResponse {
    pub rating: PizzeriaRating,
    pub average_overall: f64,
    pub average_crust: f64,
    pub count: i64,
    pub new_achievements: Vec<AchievementType>,
}

#[derive(Serialize)]
pub struct UserRatingResponse {
    pub rating: Option<PizzeriaRating>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<PizzeriaRating>,
    pub average_overall: f64,
    pub average_crust: f64,
    pub count: i64,
}

/// Stores the caller's rating, then re-evaluates their achievements. An
/// evaluation failure does not fail the submission.
#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id, pizzeria_id = %pizzeria_id))]
pub async fn submit_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pizzeria_id): Path<Uuid>,
    Json(payload): Json<SubmitRatingRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling submit rating request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(user_id = %user.user_id, ?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let rating = state
        .ratings_usecase
        .submit_rating(pizzeria_id, user.user_id, payload.into())
        .await?;

    let info = state
        .ratings_usecase
        .get_rating_info(pizzeria_id, None)
        .await?;

    let new_achievements = match state.achievements_usecase.evaluate(user.user_id).await {
        Ok(awarded) => awarded,
        Err(e) => {
            tracing::error!(error = %e, "failed to evaluate achievements after rating");
            Vec::new()
        }
    };

    tracing::debug!(pizzeria_id = %pizzeria_id, count = info.count, awarded = new_achievements.len(), "rating submitted");
    Ok((
        StatusCode::OK,
        Json(SubmitRatingResponse {
            rating,
            average_overall: info.average_overall,
            average_crust: info.average_crust,
            count: info.count,
            new_achievements,
        }),
    ))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, pizzeria_id = %pizzeria_id))]
pub async fn remove_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pizzeria_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling remove rating request");

    state
        .ratings_usecase
        .remove_rating(pizzeria_id, user.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, pizzeria_id = %pizzeria_id))]
pub async fn get_user_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pizzeria_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling get user rating request");

    let info = state
        .ratings_usecase
        .get_rating_info(pizzeria_id, Some(user.user_id))
        .await?;

    Ok((
        StatusCode::OK,
        Json(UserRatingResponse {
            rating: info.user_rating,
        }),
    ))
}

#[tracing::instrument(skip(state), fields(pizzeria_id = %pizzeria_id))]
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(pizzeria_id): Path<Uuid>,
    Query(params): Query<ReviewsQuery>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(limit = ?params.limit, offset = ?params.offset, "handling list reviews request");

    let reviews = state
        .ratings_usecase
        .list_reviews(pizzeria_id, params.limit, params.offset)
        .await?;
    let info = state
        .ratings_usecase
        .get_rating_info(pizzeria_id, None)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ReviewsResponse {
            reviews,
            average_overall: info.average_overall,
            average_crust: info.average_crust,
            count: info.count,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(overall: i16, crust: i16) -> SubmitRatingRequest {
        SubmitRatingRequest {
            overall,
            crust,
            review: Some("Leopard-spotted cornicione".to_string()),
            photos: vec![],
        }
    }

    #[test]
    fn test_submit_rating_request_validation_valid() {
        assert!(request(5, 4).validate().is_ok());
    }

    #[test]
    fn test_submit_rating_request_validation_out_of_range() {
        assert!(request(0, 4).validate().is_err());
        assert!(request(5, 6).validate().is_err());
    }

    #[test]
    fn test_submit_rating_request_validation_long_review() {
        let mut req = request(3, 3);
        req.review = Some("a".repeat(2001));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_submit_rating_request_validation_too_many_photos() {
        let mut req = request(3, 3);
        req.photos = (0..11).map(|i| format!("photo-{i}.jpg")).collect();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_photos_default_to_empty() {
        let req: SubmitRatingRequest =
            serde_json::from_str(r#"{"overall":4,"crust":5}"#).unwrap();
        assert!(req.photos.is_empty());
        assert!(req.review.is_none());
    }
}
