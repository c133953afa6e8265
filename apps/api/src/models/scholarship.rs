use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Marker used in place of an unknown application link.
pub const LINK_NOT_AVAILABLE: &str = "not available";

/// One scholarship candidate as produced by the recommendation engine.
/// Wire keys match what the generator is asked to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipRecommendation {
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<u32>,
    #[serde(default, alias = "name", deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub award_amount: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub eligibility: String,
    #[serde(default = "link_not_available", deserialize_with = "lenient_link")]
    pub apply_link: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gpa: String,
    #[serde(default, alias = "institution", deserialize_with = "lenient_string")]
    pub university: String,
}

/// The two ordered collections returned by a recommendation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipSet {
    pub primary: Vec<ScholarshipRecommendation>,
    pub overlapping: Vec<ScholarshipRecommendation>,
}

/// `saved_scholarships` row. Serialized in the bookmark wire layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedScholarship {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub award_amount: String,
    pub due_date: String,
    pub institution: String,
    pub apply_link: String,
    pub is_successful: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields a user submits when bookmarking a candidate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavedScholarship {
    pub title: String,
    #[serde(default, alias = "award_amount")]
    pub award_amount: String,
    #[serde(default, alias = "due_date")]
    pub due_date: String,
    #[serde(default, alias = "university")]
    pub institution: String,
    #[serde(alias = "apply_link")]
    pub apply_link: String,
}

fn link_not_available() -> String {
    LINK_NOT_AVAILABLE.to_string()
}

/// Accepts strings, numbers and booleans; `null` becomes the empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, got {other}"
        ))),
    }
}

fn lenient_link<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let link = lenient_string(deserializer)?;
    if link.is_empty() {
        Ok(link_not_available())
    } else {
        Ok(link)
    }
}

/// Accepts `3`, `"3"` and `null`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_u64().and_then(|v| u32::try_from(v).ok())),
        Value::String(s) => Ok(s.trim().trim_start_matches('#').parse().ok()),
        _ => Ok(None),
    }
}
