use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Serialize;

use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::achievement::{AchievementProgress, AchievementType};
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Serialize)]
pub struct AchievementsResponse {
    pub achievements: Vec<AchievementProgress>,
    pub earned: usize,
    pub total: usize,
}

#[derive(Serialize)]
pub struct EvaluateResponse {
    pub new_achievements: Vec<AchievementType>,
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_achievements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling list achievements request");

    let achievements = state.achievements_usecase.list_progress(user.user_id).await?;
    let earned = achievements.iter().filter(|a| a.earned).count();
    let total = achievements.len();

    Ok((
        StatusCode::OK,
        Json(AchievementsResponse {
            achievements,
            earned,
            total,
        }),
    ))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn evaluate_achievements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling evaluate achievements request");

    let new_achievements = state.achievements_usecase.evaluate(user.user_id).await?;

    tracing::debug!(awarded = new_achievements.len(), "achievements evaluated");
    Ok((StatusCode::OK, Json(EvaluateResponse { new_achievements })))
}
