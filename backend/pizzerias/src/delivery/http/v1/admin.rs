use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::dough_style::TagStatus;
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ModerateStyleRequest {
    pub status: TagStatus,
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id, tag_id = %tag_id, status = ?payload.status))]
pub async fn moderate_style(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(tag_id): Path<Uuid>,
    Json(payload): Json<ModerateStyleRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling moderate style request");

    user.require_moderator()?;

    let tag = state
        .dough_styles_usecase
        .moderate(tag_id, payload.status)
        .await?;

    tracing::info!(tag_id = %tag_id, moderator_id = %user.user_id, "style tag moderated");
    Ok((StatusCode::OK, Json(tag)))
}
