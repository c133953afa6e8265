//! Saved-scholarship store — per-user bookmarks.
//! Every query is scoped by owner; another user's bookmark looks absent.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::scholarship::{NewSavedScholarship, SavedScholarship};

#[async_trait]
pub trait SavedScholarshipStore: Send + Sync {
    /// Newest first.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<SavedScholarship>, AppError>;

    async fn find_duplicate(
        &self,
        owner_id: Uuid,
        title: &str,
        apply_link: &str,
    ) -> Result<Option<SavedScholarship>, AppError>;

    /// Fails with `Conflict` if (owner, apply link, title) already exists.
    async fn insert(
        &self,
        owner_id: Uuid,
        new: &NewSavedScholarship,
    ) -> Result<SavedScholarship, AppError>;

    async fn set_success(
        &self,
        owner_id: Uuid,
        id: Uuid,
        is_successful: bool,
    ) -> Result<Option<SavedScholarship>, AppError>;

    /// `false` when nothing was deleted.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgSavedScholarshipStore {
    pool: PgPool,
}

impl PgSavedScholarshipStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedScholarshipStore for PgSavedScholarshipStore {
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<SavedScholarship>, AppError> {
        Ok(sqlx::query_as::<_, SavedScholarship>(
            "SELECT * FROM saved_scholarships WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_duplicate(
        &self,
        owner_id: Uuid,
        title: &str,
        apply_link: &str,
    ) -> Result<Option<SavedScholarship>, AppError> {
        Ok(sqlx::query_as::<_, SavedScholarship>(
            "SELECT * FROM saved_scholarships WHERE owner_id = $1 AND title = $2 AND apply_link = $3",
        )
        .bind(owner_id)
        .bind(title)
        .bind(apply_link)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        new: &NewSavedScholarship,
    ) -> Result<SavedScholarship, AppError> {
        sqlx::query_as::<_, SavedScholarship>(
            r#"
            INSERT INTO saved_scholarships
                (id, owner_id, title, award_amount, due_date, institution, apply_link)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&new.title)
        .bind(&new.award_amount)
        .bind(&new.due_date)
        .bind(&new.institution)
        .bind(&new.apply_link)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Scholarship already saved".to_string())
            }
            other => AppError::Database(other),
        })
    }

    async fn set_success(
        &self,
        owner_id: Uuid,
        id: Uuid,
        is_successful: bool,
    ) -> Result<Option<SavedScholarship>, AppError> {
        Ok(sqlx::query_as::<_, SavedScholarship>(
            "UPDATE saved_scholarships SET is_successful = $3 WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner_id)
        .bind(is_successful)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM saved_scholarships WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
