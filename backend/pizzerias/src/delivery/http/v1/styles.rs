use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::dough_style::{DoughStyle, DoughStyleTag};
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestStyleRequest {
    pub style: DoughStyle,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub upvote: bool,
}

#[derive(Serialize)]
pub struct StylesResponse {
    pub styles: Vec<DoughStyleTag>,
}

#[tracing::instrument(skip(state), fields(pizzeria_id = %pizzeria_id))]
pub async fn list_styles(
    State(state): State<Arc<AppState>>,
    Path(pizzeria_id): Path<Uuid>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling list styles request");

    let styles = state.dough_styles_usecase.list_approved(pizzeria_id).await?;

    Ok((StatusCode::OK, Json(StylesResponse { styles })))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, pizzeria_id = %pizzeria_id, style = %payload.style))]
pub async fn suggest_style(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(pizzeria_id): Path<Uuid>,
    Json(payload): Json<SuggestStyleRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling suggest style request");

    let tag = state
        .dough_styles_usecase
        .suggest(pizzeria_id, user.user_id, payload.style)
        .await?;

    Ok((StatusCode::OK, Json(tag)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, tag_id = %tag_id, upvote = payload.upvote))]
pub async fn vote_style(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(tag_id): Path<Uuid>,
    Json(payload): Json<VoteRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling vote style request");

    let tag = state
        .dough_styles_usecase
        .vote(tag_id, payload.upvote)
        .await?;

    Ok((StatusCode::OK, Json(tag)))
}
