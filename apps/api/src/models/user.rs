use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full `users` row, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub race: Option<String>,
    pub gender: Option<String>,
    pub state: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub gpa: Option<String>,
    pub religion: Option<String>,
    pub hobbies: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Demographic and academic attributes a user can edit.
/// Every field is optional free text; `gpa` is kept as the string the user typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAttributes {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub state: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub gpa: Option<String>,
    pub religion: Option<String>,
    pub hobbies: Option<String>,
    pub race: Option<String>,
    pub gender: Option<String>,
}

/// Public view of a user, safe to return to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(flatten)]
    pub attributes: ProfileAttributes,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            attributes: ProfileAttributes {
                first_name: row.first_name,
                last_name: row.last_name,
                state: row.state,
                university: row.university,
                major: row.major,
                gpa: row.gpa,
                religion: row.religion,
                hobbies: row.hobbies,
                race: row.race,
                gender: row.gender,
            },
            created_at: row.created_at,
        }
    }
}
