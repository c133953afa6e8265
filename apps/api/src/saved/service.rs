//! Bookmark rules and the tracker summary.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::scholarship::{NewSavedScholarship, SavedScholarship};
use crate::saved::store::SavedScholarshipStore;

/// Counts shown on the application tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSummary {
    pub pending: usize,
    pub successful: usize,
    /// Sum of parsed award amounts over successful bookmarks.
    pub total_awarded: f64,
}

impl TrackerSummary {
    pub fn from_saved(saved: &[SavedScholarship]) -> Self {
        let successful: Vec<_> = saved.iter().filter(|s| s.is_successful).collect();
        Self {
            pending: saved.len() - successful.len(),
            successful: successful.len(),
            total_awarded: successful
                .iter()
                .map(|s| parse_award_amount(&s.award_amount))
                .sum(),
        }
    }
}

/// First amount in a free-text award string, thousands separators dropped.
/// `"$1,500"` → 1500.0, `"$1,000 - $5,000"` → 1000.0, `"Varies"` → 0.0.
pub fn parse_award_amount(raw: &str) -> f64 {
    let amount: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .filter(|c| *c != ',')
        .collect();
    amount
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Saves a bookmark, rejecting blanks and duplicates of (owner, title, apply link).
pub async fn save_bookmark(
    store: &dyn SavedScholarshipStore,
    owner_id: Uuid,
    mut new: NewSavedScholarship,
) -> Result<SavedScholarship, AppError> {
    new.title = new.title.trim().to_string();
    new.apply_link = new.apply_link.trim().to_string();

    if new.title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if new.apply_link.is_empty() {
        return Err(AppError::Validation("applyLink is required".to_string()));
    }

    if store
        .find_duplicate(owner_id, &new.title, &new.apply_link)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Scholarship already saved".to_string()));
    }

    let saved = store.insert(owner_id, &new).await?;
    info!("User {owner_id} saved scholarship {}", saved.id);
    Ok(saved)
}
