//! Store layer: SQLite pool, embedded migrations, the [`Task`] model, query
//! functions, and the [`TaskStore`] live-query contract the controller
//! consumes.
//!
//! [`Task`]: models::Task
//! [`TaskStore`]: store::TaskStore

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;
