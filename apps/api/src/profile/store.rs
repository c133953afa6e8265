//! Profile store — persistence of user records.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{ProfileAttributes, UserRow};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError>;

    /// Inserts a new user. Fails with `Conflict` when the email is taken.
    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRow, AppError>;

    /// Overwrites the editable attributes. `None` when the user does not exist.
    async fn update_attributes(
        &self,
        id: Uuid,
        attrs: &ProfileAttributes,
    ) -> Result<Option<UserRow>, AppError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRow>, AppError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<UserRow, AppError> {
        sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Email already in use".to_string())
            }
            other => AppError::Database(other),
        })
    }

    async fn update_attributes(
        &self,
        id: Uuid,
        attrs: &ProfileAttributes,
    ) -> Result<Option<UserRow>, AppError> {
        Ok(sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, state = $4, university = $5, major = $6,
                gpa = $7, religion = $8, hobbies = $9, race = $10, gender = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&attrs.first_name)
        .bind(&attrs.last_name)
        .bind(&attrs.state)
        .bind(&attrs.university)
        .bind(&attrs.major)
        .bind(&attrs.gpa)
        .bind(&attrs.religion)
        .bind(&attrs.hobbies)
        .bind(&attrs.race)
        .bind(&attrs.gender)
        .fetch_optional(&self.pool)
        .await?)
    }
}
