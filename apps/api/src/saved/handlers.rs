//! Axum route handlers for the Saved Scholarships (tracker) API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::scholarship::{NewSavedScholarship, SavedScholarship};
use crate::saved::service::{save_bookmark, TrackerSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedListResponse {
    pub saved_scholarships: Vec<SavedScholarship>,
    pub summary: TrackerSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedOneResponse {
    pub saved_scholarship: SavedScholarship,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessToggle {
    pub is_successful: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Saved scholarship {id} not found"))
}

/// GET /api/savedScholarships
pub async fn handle_list_saved(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SavedListResponse>, AppError> {
    let saved_scholarships = state.saved.list_for_owner(user.user_id).await?;
    let summary = TrackerSummary::from_saved(&saved_scholarships);
    Ok(Json(SavedListResponse {
        saved_scholarships,
        summary,
    }))
}

/// POST /api/savedScholarships
pub async fn handle_save(
    State(state): State<AppState>,
    user: AuthUser,
    Json(new): Json<NewSavedScholarship>,
) -> Result<(StatusCode, Json<SavedOneResponse>), AppError> {
    let saved_scholarship = save_bookmark(state.saved.as_ref(), user.user_id, new).await?;
    Ok((
        StatusCode::CREATED,
        Json(SavedOneResponse { saved_scholarship }),
    ))
}

/// PUT /api/savedScholarships/:id
pub async fn handle_toggle_success(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SuccessToggle>,
) -> Result<Json<SavedOneResponse>, AppError> {
    let saved_scholarship = state
        .saved
        .set_success(user.user_id, id, req.is_successful)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(SavedOneResponse { saved_scholarship }))
}

/// DELETE /api/savedScholarships/:id
pub async fn handle_delete_saved(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, AppError> {
    if !state.saved.delete(user.user_id, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(DeletedResponse {
        message: "Saved scholarship removed".to_string(),
    }))
}
