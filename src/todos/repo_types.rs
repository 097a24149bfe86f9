use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Todo row, also the wire shape returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub user_id: Uuid, // owner, never changes
}

impl Todo {
    pub fn new(title: String, owner: Uuid, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            completed: false,
            created_at: now,
            updated_at: now,
            user_id: owner,
        }
    }

    #[cfg(test)]
    pub fn is_owned_by(&self, requester: Uuid) -> bool {
        self.user_id == requester
    }
}

/// Partial update. Present fields overwrite, absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }

    /// Merges into `todo` and bumps `updated_at`, which never moves backwards.
    pub fn apply(self, todo: &mut Todo, now: OffsetDateTime) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        todo.updated_at = now.max(todo.updated_at);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
    pub total: usize,
}

impl From<Vec<Todo>> for TodoList {
    fn from(todos: Vec<Todo>) -> Self {
        let total = todos.len();
        Self { todos, total }
    }
}
