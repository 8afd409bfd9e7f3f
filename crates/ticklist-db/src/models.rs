use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted to-do item.
///
/// `id == 0` marks a task that has not been persisted yet; SQLite assigns
/// the real row id on insert. The type is immutable-by-value: updates go
/// through [`Task::with_title`] / [`Task::with_done`], which return modified
/// copies rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub is_done: bool,
}

impl Task {
    /// Build a new, not-yet-persisted task. The store assigns the identity.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            is_done: false,
        }
    }

    /// Copy of this task with a different title.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Copy of this task with a different done flag.
    pub fn with_done(&self, is_done: bool) -> Self {
        Self {
            is_done,
            ..self.clone()
        }
    }
}
