//! Shared lazy subscription to the store's live query.
//!
//! The upstream `observe_all` stream is started when the first observer
//! attaches and torn down a grace period after the last one detaches. The
//! watch channel retains the last published state, so an observer that
//! reattaches (screen rotation, tab switch) replays the latest snapshot
//! instead of flickering back to the loading state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use ticklist_db::models::Task;
use ticklist_db::store::TaskStore;

use crate::state::TaskListState;

use super::watcher::StateWatcher;

pub(crate) struct SharedQuery {
    store: Arc<dyn TaskStore>,
    tx: watch::Sender<TaskListState>,
    handle: Handle,
    idle_grace: Duration,
    /// Controller-scoped token; parents every upstream and idle timer.
    cancel: CancellationToken,
    inner: Mutex<ShareInner>,
}

struct ShareInner {
    observers: usize,
    /// Bumped on every attach. An idle timer only tears the upstream down
    /// if no attach happened after it was scheduled.
    epoch: u64,
    /// Token for the running upstream task, if any.
    upstream: Option<CancellationToken>,
}

impl SharedQuery {
    pub(crate) fn new(
        store: Arc<dyn TaskStore>,
        handle: Handle,
        idle_grace: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, _) = watch::channel(TaskListState::default());
        Self {
            store,
            tx,
            handle,
            idle_grace,
            cancel,
            inner: Mutex::new(ShareInner {
                observers: 0,
                epoch: 0,
                upstream: None,
            }),
        }
    }

    /// The latest published state.
    pub(crate) fn current(&self) -> TaskListState {
        self.tx.borrow().clone()
    }

    /// Find a task by id in the latest published state.
    pub(crate) fn current_task(&self, task_id: i64) -> Option<Task> {
        self.tx.borrow().find(task_id).cloned()
    }

    /// Record a failed store mutation in the published state. The next
    /// emission replaces the whole state and clears it.
    pub(crate) fn publish_error(&self, message: String) {
        self.tx.send_modify(|state| state.last_error = Some(message));
    }

    /// Register a new observer, starting the upstream subscription if it
    /// is not already running.
    pub(crate) fn attach(this: &Arc<Self>) -> StateWatcher {
        let rx = this.tx.subscribe();

        let mut inner = this.inner.lock().expect("share state poisoned");
        inner.observers += 1;
        inner.epoch += 1;
        if inner.upstream.is_none() {
            inner.upstream = Some(this.spawn_upstream());
        }
        drop(inner);

        StateWatcher::new(rx, Arc::clone(this))
    }

    /// Drop an observer. When the count reaches zero, schedule teardown of
    /// the upstream after the idle grace period -- unless someone attaches
    /// again in the meantime.
    pub(crate) fn detach(this: &Arc<Self>) {
        let mut inner = this.inner.lock().expect("share state poisoned");
        inner.observers -= 1;
        if inner.observers > 0 {
            return;
        }

        let epoch = inner.epoch;
        drop(inner);

        let share = Arc::clone(this);
        let cancel = this.cancel.clone();
        let idle_grace = this.idle_grace;
        this.handle.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(idle_grace) => {}
            }
            let mut inner = share.inner.lock().expect("share state poisoned");
            if inner.observers == 0 && inner.epoch == epoch {
                if let Some(token) = inner.upstream.take() {
                    debug!("idle grace elapsed, stopping live query");
                    token.cancel();
                }
            }
        });
    }

    /// Spawn the upstream task: consume the store's live query and map
    /// every emission into the published state. Returns the token that
    /// stops it.
    fn spawn_upstream(&self) -> CancellationToken {
        let token = self.cancel.child_token();
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        let task_token = token.clone();
        self.handle.spawn(async move {
            debug!("starting live query subscription");
            let mut emissions = store.observe_all();
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    next = emissions.next() => match next {
                        Some(tasks) => {
                            tx.send_replace(TaskListState::loaded(tasks));
                        }
                        // The store's stream only ends when the store
                        // itself is gone.
                        None => break,
                    },
                }
            }
            debug!("live query subscription stopped");
        });
        token
    }
}
