use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderName, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateTodoRequest, UpdateTodoRequest},
    repo_types::{Todo, TodoList},
};
use crate::{
    auth::{jwt::AuthUser, roles::Right},
    error::{json_body, AppError},
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos))
        .route("/todos/:id", get(get_todo))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", post(create_todo))
        .route("/todos/:id", put(update_todo).delete(delete_todo))
}

fn todo_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::Validation("Invalid todo id".into()))
}

// --- handlers ---

#[instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn create_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Todo>), AppError> {
    auth.require(Right::ManageTodos)?;
    let title = json_body(body)?.validate()?;

    let todo = state.todos.create(&title, auth.user_id).await?;
    info!(todo_id = %todo.id, "todo created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/todos/{}", todo.id))],
        Json(todo),
    ))
}

#[instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn list_todos(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TodoList>, AppError> {
    auth.require(Right::GetTodos)?;
    let list = state.todos.list_by_owner(auth.user_id).await?;
    Ok(Json(list))
}

#[instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn get_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Todo>, AppError> {
    auth.require(Right::GetTodos)?;
    let id = todo_id(path)?;

    match state.todos.get_by_id_and_owner(id, auth.user_id).await? {
        Some(todo) => Ok(Json(todo)),
        None => {
            debug!(%id, "todo not visible to requester");
            Err(AppError::NotFound("Todo not found"))
        }
    }
}

#[instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn update_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, AppError> {
    auth.require(Right::ManageTodos)?;
    let id = todo_id(path)?;
    let patch = json_body(body)?.validate()?;

    let todo = state
        .todos
        .update_by_id_and_owner(id, auth.user_id, patch)
        .await?;
    info!(todo_id = %todo.id, completed = todo.completed, "todo updated");
    Ok(Json(todo))
}

#[instrument(skip_all, fields(user_id = %auth.user_id))]
pub async fn delete_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    auth.require(Right::ManageTodos)?;
    let id = todo_id(path)?;

    state.todos.delete_by_id_and_owner(id, auth.user_id).await?;
    info!(todo_id = %id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
