use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::geo::Coordinates;
use crate::domain::pizzeria::NearbyPizzeria;
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SavedQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl SavedQuery {
    fn origin(&self) -> Result<Option<Coordinates>, UsecaseError> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Ok(Some(Coordinates::new(lat, lng))),
            (None, None) => Ok(None),
            _ => Err(UsecaseError::Validation(
                "lat and lng must be given together".to_string(),
            )),
        }
    }
}

#[derive(Serialize)]
pub struct SavedStatusResponse {
    pub saved: bool,
}

#[derive(Serialize)]
pub struct SavedListResponse {
    pub pizzerias: Vec<NearbyPizzeria>,
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, pizzeria_id = %pizzeria_id))]
pub async fn save_pizzeria(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pizzeria_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling save pizzeria request");

    state.saved_usecase.save(pizzeria_id, user.user_id).await?;

    Ok((StatusCode::OK, Json(SavedStatusResponse { saved: true })))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, pizzeria_id = %pizzeria_id))]
pub async fn unsave_pizzeria(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pizzeria_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling unsave pizzeria request");

    state.saved_usecase.unsave(pizzeria_id, user.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, pizzeria_id = %pizzeria_id))]
pub async fn get_saved_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pizzeria_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    let saved = state.saved_usecase.is_saved(pizzeria_id, user.user_id).await?;

    Ok((StatusCode::OK, Json(SavedStatusResponse { saved })))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_saved(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<SavedQuery>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling list saved request");

    let pizzerias = state
        .saved_usecase
        .list_saved(user.user_id, params.origin()?)
        .await?;

    tracing::debug!(count = pizzerias.len(), "saved pizzerias retrieved");
    Ok((StatusCode::OK, Json(SavedListResponse { pizzerias })))
}
