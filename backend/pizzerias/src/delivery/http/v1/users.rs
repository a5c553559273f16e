use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Deserialize;
use validator::Validate;

use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::geo::Coordinates;
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling update location request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(user_id = %user.user_id, ?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let location = state
        .users_usecase
        .update_location(user.user_id, Coordinates::new(payload.lat, payload.lng))
        .await?;

    Ok((StatusCode::OK, Json(location)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    let location = state.users_usecase.get_location(user.user_id).await?;

    Ok((StatusCode::OK, Json(location)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_location_validation() {
        assert!(UpdateLocationRequest { lat: 40.7, lng: -74.0 }.validate().is_ok());
        assert!(UpdateLocationRequest { lat: -91.0, lng: 0.0 }.validate().is_err());
        assert!(UpdateLocationRequest { lat: 0.0, lng: 180.5 }.validate().is_err());
    }
}
