//! The task state controller.
//!
//! Subscribes to the store's live task query, republishes it as a
//! [`TaskListState`], and exposes fire-and-forget intent operations that
//! validate input and forward mutations to the store. The published state
//! is only ever advanced by a fresh store emission; intents never write the
//! task list directly.

pub(crate) mod share;
pub mod watcher;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use ticklist_db::models::Task;
use ticklist_db::store::{StoreError, TaskStore};

use crate::state::TaskListState;

use share::SharedQuery;
use watcher::StateWatcher;

/// Configuration for a [`TaskController`].
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// How long the store subscription survives after the last observer
    /// detaches before it is torn down.
    pub idle_grace: Duration,
    /// Runtime handle intent operations and the subscription run on. An
    /// explicit injection point so the controller is testable without any
    /// UI runtime.
    pub handle: Handle,
}

impl ControllerConfig {
    pub const DEFAULT_IDLE_GRACE: Duration = Duration::from_secs(5);

    pub fn new(handle: Handle) -> Self {
        Self {
            idle_grace: Self::DEFAULT_IDLE_GRACE,
            handle,
        }
    }

    pub fn with_idle_grace(mut self, idle_grace: Duration) -> Self {
        self.idle_grace = idle_grace;
        self
    }
}

impl Default for ControllerConfig {
    /// Captures the ambient runtime. Panics outside a tokio runtime, like
    /// [`Handle::current`].
    fn default() -> Self {
        Self::new(Handle::current())
    }
}

/// Bridges the store's live query to a publishable UI state and mediates
/// user intents into store mutations.
pub struct TaskController {
    store: Arc<dyn TaskStore>,
    share: Arc<SharedQuery>,
    handle: Handle,
    /// Cancelled on teardown; aborts the subscription and in-flight intents.
    cancel: CancellationToken,
    intents: TaskTracker,
}

impl TaskController {
    pub fn new(store: Arc<dyn TaskStore>, config: ControllerConfig) -> Self {
        let cancel = CancellationToken::new();
        let share = Arc::new(SharedQuery::new(
            Arc::clone(&store),
            config.handle.clone(),
            config.idle_grace,
            cancel.clone(),
        ));
        Self {
            store,
            share,
            handle: config.handle,
            cancel,
            intents: TaskTracker::new(),
        }
    }

    /// Attach an observer to the published state.
    ///
    /// The returned watcher immediately holds the latest state -- the
    /// loading default before the first emission, the last snapshot
    /// otherwise -- and sees every subsequent update.
    pub fn observe(&self) -> StateWatcher {
        SharedQuery::attach(&self.share)
    }

    /// The latest published state, without registering an observer.
    pub fn current_state(&self) -> TaskListState {
        self.share.current()
    }

    // -------------------------------------------------------------------
    // Intents
    // -------------------------------------------------------------------

    /// Insert a new task with the given title (trimmed) and `is_done`
    /// false; the store assigns the id.
    ///
    /// Deliberately performs no blank-title rejection, unlike
    /// [`Self::update_task_title`] -- the add screen is expected to
    /// validate, and the asymmetry is preserved from the design this
    /// controller replaces.
    pub fn add_task(&self, title: &str) {
        let task = Task::new(title.trim());
        let store = Arc::clone(&self.store);
        self.spawn_intent("insert", async move { store.insert(task).await });
    }

    /// Flip the done flag of the task with the given id. Silent no-op if
    /// the id is not in the current published state.
    pub fn toggle_task_done(&self, task_id: i64) {
        let Some(task) = self.share.current_task(task_id) else {
            debug!(task_id, "toggle ignored, task not in current state");
            return;
        };
        let updated = task.with_done(!task.is_done);
        let store = Arc::clone(&self.store);
        self.spawn_intent("update", async move { store.update(updated).await });
    }

    /// Rename the task with the given id. A title that is blank after
    /// trimming is rejected without contacting the store; an id missing
    /// from the current published state is a silent no-op.
    pub fn update_task_title(&self, task_id: i64, new_title: &str) {
        let trimmed = new_title.trim();
        if trimmed.is_empty() {
            debug!(task_id, "rename ignored, blank title");
            return;
        }
        let Some(task) = self.share.current_task(task_id) else {
            debug!(task_id, "rename ignored, task not in current state");
            return;
        };
        let updated = task.with_title(trimmed);
        let store = Arc::clone(&self.store);
        self.spawn_intent("update", async move { store.update(updated).await });
    }

    /// Delete the task with the given id. Silent no-op if the id is not in
    /// the current published state.
    pub fn delete_task(&self, task_id: i64) {
        let Some(task) = self.share.current_task(task_id) else {
            debug!(task_id, "delete ignored, task not in current state");
            return;
        };
        let store = Arc::clone(&self.store);
        self.spawn_intent("delete", async move { store.delete(task).await });
    }

    /// Delete every task, regardless of current state.
    pub fn delete_all_tasks(&self) {
        let store = Arc::clone(&self.store);
        self.spawn_intent("delete_all", async move { store.delete_all().await });
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Graceful teardown: wait for in-flight intents to finish, then stop
    /// the store subscription. The controller accepts no new intents
    /// afterwards.
    pub async fn shutdown(&self) {
        self.intents.close();
        self.intents.wait().await;
        self.cancel.cancel();
    }

    /// Spawn a fire-and-forget store call, tracked and bound to the
    /// controller's cancellation scope. A failure is logged and surfaced
    /// through `last_error`; it never unwinds into the caller.
    fn spawn_intent<F>(&self, op: &'static str, fut: F)
    where
        F: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        if self.intents.is_closed() {
            debug!(op, "intent ignored, controller shut down");
            return;
        }
        let cancel = self.cancel.clone();
        let share = Arc::clone(&self.share);
        self.intents.spawn_on(
            async move {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(op, "intent cancelled at teardown");
                    }
                    result = fut => {
                        if let Err(err) = result {
                            warn!(op, error = %err, "store mutation failed");
                            share.publish_error(err.to_string());
                        }
                    }
                }
            },
            &self.handle,
        );
    }
}

impl Drop for TaskController {
    /// Hard teardown: aborts the subscription and any in-flight intents.
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
