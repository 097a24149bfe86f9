use crate::{auth::repo_types::User, error::AppError};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, email, password_hash, name, role, is_email_verified, created_at, updated_at";

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password. Role defaults to USER in the schema.
    /// A taken email maps to `Conflict`, including when a concurrent insert wins.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, name)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_one(db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Email already registered".into())
            }
            other => AppError::Internal(other.into()),
        })?;
        Ok(user)
    }
}
