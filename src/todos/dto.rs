use serde::Deserialize;

use super::repo_types::TodoPatch;
use crate::error::AppError;

pub const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Trims and checks length in characters, not bytes.
pub fn validate_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_owned())
}

impl CreateTodoRequest {
    pub fn validate(self) -> Result<String, AppError> {
        validate_title(&self.title)
    }
}

impl UpdateTodoRequest {
    pub fn validate(self) -> Result<TodoPatch, AppError> {
        let patch = TodoPatch {
            title: self.title.as_deref().map(validate_title).transpose()?,
            completed: self.completed,
        };
        if patch.is_empty() {
            return Err(AppError::Validation(
                "At least one field must be provided".into(),
            ));
        }
        Ok(patch)
    }
}
