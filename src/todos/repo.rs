use axum::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::repo_types::{Todo, TodoList, TodoPatch};

#[derive(Debug, Error)]
pub enum RepoError {
    /// No todo matches `(id, owner)`. Covers "exists but belongs to someone else".
    #[error("todo not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Todo persistence. Every single-record operation is scoped by `(id, owner)`;
/// an id on its own never resolves a record.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn create(&self, title: &str, owner: Uuid) -> Result<Todo, RepoError>;

    /// Newest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<TodoList, RepoError>;

    async fn get_by_id_and_owner(&self, id: Uuid, owner: Uuid)
        -> Result<Option<Todo>, RepoError>;

    async fn update_by_id_and_owner(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TodoPatch,
    ) -> Result<Todo, RepoError>;

    /// Returns the record as it was before deletion.
    async fn delete_by_id_and_owner(&self, id: Uuid, owner: Uuid) -> Result<Todo, RepoError>;
}

const TODO_COLUMNS: &str = "id, title, completed, created_at, updated_at, user_id";

#[derive(Clone)]
pub struct PgTodoStore {
    db: PgPool,
}

impl PgTodoStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn create(&self, title: &str, owner: Uuid) -> Result<Todo, RepoError> {
        let draft = Todo::new(title.to_owned(), owner, OffsetDateTime::now_utc());
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            INSERT INTO todos (id, title, completed, created_at, updated_at, user_id)
            VALUES ($1, $2, $3, $4, $4, $5)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(draft.id)
        .bind(&draft.title)
        .bind(draft.completed)
        .bind(draft.created_at)
        .bind(draft.user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(todo)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<TodoList, RepoError> {
        let rows = sqlx::query_as::<_, Todo>(&format!(
            r#"
            SELECT {TODO_COLUMNS}
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into())
    }

    async fn get_by_id_and_owner(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Todo>, RepoError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }

    async fn update_by_id_and_owner(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TodoPatch,
    ) -> Result<Todo, RepoError> {
        let mut tx = self.db.begin().await?;

        let Some(mut todo) = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?
        else {
            debug!(%id, "update: no todo for owner");
            return Err(RepoError::NotFound);
        };

        patch.apply(&mut todo, OffsetDateTime::now_utc());

        let updated = sqlx::query_as::<_, Todo>(&format!(
            r#"
            UPDATE todos
               SET title = $3, completed = $4, updated_at = $5
             WHERE id = $1 AND user_id = $2
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(&todo.title)
        .bind(todo.completed)
        .bind(todo.updated_at)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepoError::NotFound)?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_by_id_and_owner(&self, id: Uuid, owner: Uuid) -> Result<Todo, RepoError> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM todos WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            debug!(%id, "delete: no todo for owner");
            return Err(RepoError::NotFound);
        }

        let deleted = sqlx::query_as::<_, Todo>(&format!(
            "DELETE FROM todos WHERE id = $1 AND user_id = $2 RETURNING {TODO_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepoError::NotFound)?;

        tx.commit().await?;
        Ok(deleted)
    }
}
