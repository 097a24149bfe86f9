use axum::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    repo::{RepoError, TodoStore},
    repo_types::{Todo, TodoList, TodoPatch},
};

/// In-process store with the same ownership rules as `PgTodoStore`.
/// The write lock makes check-then-act atomic.
#[derive(Default)]
pub struct MemoryTodoStore {
    rows: RwLock<Vec<Todo>>, // insertion order
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn create(&self, title: &str, owner: Uuid) -> Result<Todo, RepoError> {
        let todo = Todo::new(title.to_owned(), owner, OffsetDateTime::now_utc());
        self.rows.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<TodoList, RepoError> {
        let rows = self.rows.read().await;
        // Reverse first so the stable sort keeps later inserts ahead on equal timestamps.
        let mut todos: Vec<Todo> = rows
            .iter()
            .rev()
            .filter(|t| t.is_owned_by(owner))
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos.into())
    }

    async fn get_by_id_and_owner(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Todo>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|t| t.id == id && t.is_owned_by(owner))
            .cloned())
    }

    async fn update_by_id_and_owner(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TodoPatch,
    ) -> Result<Todo, RepoError> {
        let mut rows = self.rows.write().await;
        let todo = rows
            .iter_mut()
            .find(|t| t.id == id && t.is_owned_by(owner))
            .ok_or(RepoError::NotFound)?;
        patch.apply(todo, OffsetDateTime::now_utc());
        Ok(todo.clone())
    }

    async fn delete_by_id_and_owner(&self, id: Uuid, owner: Uuid) -> Result<Todo, RepoError> {
        let mut rows = self.rows.write().await;
        let idx = rows
            .iter()
            .position(|t| t.id == id && t.is_owned_by(owner))
            .ok_or(RepoError::NotFound)?;
        Ok(rows.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_sets_defaults_and_keeps_title() {
        let store = MemoryTodoStore::new();
        let owner = Uuid::new_v4();
        let todo = store.create("Buy milk", owner).await.unwrap();
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.created_at, todo.updated_at);
        assert_eq!(todo.user_id, owner);
    }

    #[tokio::test]
    async fn created_ids_are_unique() {
        let store = MemoryTodoStore::new();
        let owner = Uuid::new_v4();
        let a = store.create("a", owner).await.unwrap();
        let b = store.create("a", owner).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn other_owner_sees_nothing() {
        let store = MemoryTodoStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let todo = store.create("private", alice).await.unwrap();

        assert!(store
            .get_by_id_and_owner(todo.id, bob)
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            store
                .update_by_id_and_owner(
                    todo.id,
                    bob,
                    TodoPatch {
                        title: None,
                        completed: Some(true)
                    }
                )
                .await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            store.delete_by_id_and_owner(todo.id, bob).await,
            Err(RepoError::NotFound)
        ));

        // untouched for the real owner
        let still = store
            .get_by_id_and_owner(todo.id, alice)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(still, todo);
    }

    #[tokio::test]
    async fn unknown_id_and_foreign_id_fail_the_same_way() {
        let store = MemoryTodoStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let todo = store.create("x", alice).await.unwrap();

        let foreign = store.delete_by_id_and_owner(todo.id, bob).await.unwrap_err();
        let missing = store
            .delete_by_id_and_owner(Uuid::new_v4(), bob)
            .await
            .unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());
    }

    #[tokio::test]
    async fn list_is_scoped_and_newest_first() {
        let store = MemoryTodoStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        for i in 0..5 {
            store.create(&format!("alice {i}"), alice).await.unwrap();
            store.create(&format!("bob {i}"), bob).await.unwrap();
        }

        let list = store.list_by_owner(alice).await.unwrap();
        assert_eq!(list.total, 5);
        assert_eq!(list.todos.len(), 5);
        assert!(list.todos.iter().all(|t| t.user_id == alice));
        assert!(list
            .todos
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(list.todos[0].title, "alice 4");
        assert_eq!(list.todos[4].title, "alice 0");

        let empty = store.list_by_owner(Uuid::new_v4()).await.unwrap();
        assert_eq!(empty.total, 0);
    }

    #[tokio::test]
    async fn completing_keeps_title_and_bumps_updated_at() {
        let store = MemoryTodoStore::new();
        let owner = Uuid::new_v4();
        let todo = store.create("Buy milk", owner).await.unwrap();

        let updated = store
            .update_by_id_and_owner(
                todo.id,
                owner,
                TodoPatch {
                    title: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Buy milk");
        assert!(updated.completed);
        assert!(updated.updated_at >= todo.updated_at);
        assert_eq!(updated.created_at, todo.created_at);
        assert_eq!(updated.user_id, owner);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let store = MemoryTodoStore::new();
        let owner = Uuid::new_v4();
        let todo = store.create("once", owner).await.unwrap();

        let deleted = store.delete_by_id_and_owner(todo.id, owner).await.unwrap();
        assert_eq!(deleted.id, todo.id);
        assert!(matches!(
            store.delete_by_id_and_owner(todo.id, owner).await,
            Err(RepoError::NotFound)
        ));
        assert!(store
            .get_by_id_and_owner(todo.id, owner)
            .await
            .unwrap()
            .is_none());
    }
}
