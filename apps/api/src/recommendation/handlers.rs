//! Axum route handlers for the Scholarship API.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::scholarship::ScholarshipRecommendation;
use crate::models::user::UserProfile;
use crate::recommendation::engine::{DegradeReason, RecommendationOutcome};
use crate::recommendation::query::ScholarshipQuery;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ScholarshipsResponse {
    pub primary: Vec<ScholarshipRecommendation>,
    /// Truncated to the configured display count.
    pub overlapping: Vec<ScholarshipRecommendation>,
    /// `"generated"` or `"fallback"`.
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<DegradeReason>,
}

impl ScholarshipsResponse {
    fn from_outcome(outcome: RecommendationOutcome, display_count: usize) -> Self {
        let source = outcome.source();
        let (set, degraded_reason) = match outcome {
            RecommendationOutcome::Generated(set) => (set, None),
            RecommendationOutcome::Degraded { set, reason } => (set, Some(reason)),
        };
        let mut overlapping = set.overlapping;
        overlapping.truncate(display_count);

        Self {
            primary: set.primary,
            overlapping,
            source,
            degraded_reason,
        }
    }
}

/// GET /api/scholarships
///
/// Personalized recommendations for the caller's stored profile.
/// Missing required profile fields are a 400; generation problems are not errors.
pub async fn handle_personalized_scholarships(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ScholarshipsResponse>, AppError> {
    let profile: UserProfile = state
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
        .into();

    let query =
        ScholarshipQuery::from_profile(&profile.attributes, &state.config.required_profile_fields)?;

    info!("Fetching personalized scholarships for user {}", profile.id);
    let outcome = state.recommender.recommend(&query).await;

    Ok(Json(ScholarshipsResponse::from_outcome(
        outcome,
        state.recommender.config().overlapping_display_count,
    )))
}

/// GET /api/default-scholarships
///
/// Recommendations for anonymous visitors: no profile, nothing required.
pub async fn handle_default_scholarships(
    State(state): State<AppState>,
) -> Json<ScholarshipsResponse> {
    let outcome = state.recommender.recommend(&ScholarshipQuery::default()).await;
    Json(ScholarshipsResponse::from_outcome(
        outcome,
        state.recommender.config().overlapping_display_count,
    ))
}
