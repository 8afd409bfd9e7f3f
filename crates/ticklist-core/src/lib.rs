//! The task state controller: bridges the store's live query to a
//! continuously-available published UI state, and mediates user intents
//! into store mutations.

pub mod controller;
pub mod state;

pub use controller::{ControllerConfig, TaskController};
pub use controller::watcher::{StateStream, StateWatcher};
pub use state::TaskListState;
