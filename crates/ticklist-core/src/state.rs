use ticklist_db::models::Task;

/// Snapshot of the task list as the presentation layer sees it.
///
/// Replaced wholesale on every store emission; never partially mutated.
/// The one exception is `last_error`, which an intent may set when its
/// store call fails -- the next emission clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListState {
    /// All tasks, ordered by ascending id (the store's defined order).
    pub tasks: Vec<Task>,
    /// True only before the first live-query emission has been observed.
    pub is_loading: bool,
    /// Message from the most recent failed store mutation, if any.
    pub last_error: Option<String>,
}

impl TaskListState {
    /// State derived from a store emission.
    pub(crate) fn loaded(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            is_loading: false,
            last_error: None,
        }
    }

    /// Find a task by id in this snapshot.
    pub fn find(&self, task_id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }
}

impl Default for TaskListState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            is_loading: true,
            last_error: None,
        }
    }
}
