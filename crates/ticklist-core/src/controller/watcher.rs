//! Observer handles for the published state.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::state::TaskListState;

use super::share::SharedQuery;

/// A live view of the controller's published state.
///
/// Holding a watcher counts as an active observer: the controller keeps its
/// store subscription running while at least one watcher (or stream made
/// from one) is alive, and starts the idle-teardown clock when the last one
/// is dropped.
pub struct StateWatcher {
    rx: watch::Receiver<TaskListState>,
    _guard: ObserverGuard,
}

impl StateWatcher {
    pub(crate) fn new(rx: watch::Receiver<TaskListState>, share: Arc<SharedQuery>) -> Self {
        Self {
            rx,
            _guard: ObserverGuard { share },
        }
    }

    /// The latest published state, available immediately.
    pub fn current(&self) -> TaskListState {
        self.rx.borrow().clone()
    }

    /// Wait for the next state update and return it.
    pub async fn changed(&mut self) -> TaskListState {
        // The guard keeps the sender's owner alive, so `changed` cannot
        // fail while `self` exists.
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }

    /// Return the first state (current included) satisfying a predicate.
    pub async fn wait_for(
        &mut self,
        mut pred: impl FnMut(&TaskListState) -> bool,
    ) -> TaskListState {
        loop {
            {
                let state = self.rx.borrow_and_update();
                if pred(&state) {
                    return state.clone();
                }
            }
            let _ = self.rx.changed().await;
        }
    }

    /// Adapt into a stream of states. Yields the current state first, then
    /// every subsequent update.
    pub fn into_stream(self) -> StateStream {
        StateStream {
            inner: WatchStream::new(self.rx),
            _guard: self._guard,
        }
    }
}

/// Stream adapter over a [`StateWatcher`]; still counts as an observer.
pub struct StateStream {
    inner: WatchStream<TaskListState>,
    _guard: ObserverGuard,
}

impl Stream for StateStream {
    type Item = TaskListState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// RAII observer registration; detaches on drop.
struct ObserverGuard {
    share: Arc<SharedQuery>,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        SharedQuery::detach(&self.share);
    }
}
