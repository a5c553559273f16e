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
use crate::domain::geo::Coordinates;
use crate::domain::pizzeria::{NearbyPizzeria, PizzeriaSubmission};
use crate::usecase::error::UsecaseError;
use crate::AppState;

const DEFAULT_RADIUS_KM: f64 = 8.0;

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
}

#[derive(Serialize)]
pub struct NearbyResponse {
    pub pizzerias: Vec<NearbyPizzeria>,
    pub total: usize,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitPizzeriaRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}

impl From<SubmitPizzeriaRequest> for PizzeriaSubmission {
    fn from(request: SubmitPizzeriaRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            address: request.address,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            location: Coordinates::new(request.lat, request.lng),
            phone: request.phone,
            website: request.website,
        }
    }
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, lat = params.lat, lng = params.lng))]
pub async fn discover_nearby(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<NearbyQuery>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling nearby pizzerias request");

    let radius_km = params.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    let pizzerias = state
        .discovery_usecase
        .discover_nearby(Coordinates::new(params.lat, params.lng), radius_km)
        .await?;

    tracing::debug!(count = pizzerias.len(), "nearby pizzerias retrieved");
    let total = pizzerias.len();
    Ok((StatusCode::OK, Json(NearbyResponse { pizzerias, total })))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn submit_pizzeria(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<SubmitPizzeriaRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling submit pizzeria request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(user_id = %user.user_id, ?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(format!("{:?}", validation_errors)));
    }

    let pizzeria = state
        .pizzerias_usecase
        .submit_pizzeria(user.user_id, payload.into())
        .await?;

    tracing::debug!(pizzeria_id = %pizzeria.id, "pizzeria submitted");
    Ok((StatusCode::CREATED, Json(pizzeria)))
}

#[tracing::instrument(skip(state), fields(pizzeria_id = %pizzeria_id))]
pub async fn get_pizzeria(
    State(state): State<Arc<AppState>>,
    Path(pizzeria_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling get pizzeria request");

    let details = state.pizzerias_usecase.get_pizzeria(pizzeria_id).await?;

    Ok((StatusCode::OK, Json(details)))
}
