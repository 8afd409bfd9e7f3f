//! The store contract the task controller consumes, plus its SQLite
//! implementation.
//!
//! [`SqliteTaskStore`] turns the plain query functions into a live query:
//! every successful mutation bumps a generation counter on a watch channel,
//! and each [`TaskStore::observe_all`] stream re-queries and emits a full
//! ordered snapshot whenever the counter moves. Emissions are complete
//! replacements, never deltas.

use async_trait::async_trait;
use futures::stream::BoxStream;
use sqlx::SqlitePool;
use tokio::sync::watch;
use tracing::warn;

use crate::models::Task;
use crate::queries::tasks as db;

/// Error surfaced by store mutations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store query failed: {source}")]
    Query {
        #[from]
        source: anyhow::Error,
    },
}

/// Durable task storage with a live query.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Live sequence of all tasks, ordered by ascending id.
    ///
    /// Emits the current snapshot immediately, then a fresh full snapshot
    /// after every underlying change. Infinite and restartable: each call
    /// produces an independent stream.
    fn observe_all(&self) -> BoxStream<'static, Vec<Task>>;

    /// Insert a task. An unset id (0) is assigned by the store; a
    /// conflicting id is silently ignored.
    async fn insert(&self, task: Task) -> Result<(), StoreError>;

    /// Replace the stored record matching the task's id.
    async fn update(&self, task: Task) -> Result<(), StoreError>;

    /// Remove the stored record matching the task's id.
    async fn delete(&self, task: Task) -> Result<(), StoreError>;

    /// Remove every record.
    async fn delete_all(&self) -> Result<(), StoreError>;
}

/// SQLite-backed [`TaskStore`].
pub struct SqliteTaskStore {
    pool: SqlitePool,
    /// Generation counter; bumped after every committed mutation.
    changed: watch::Sender<u64>,
}

impl SqliteTaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        let (changed, _) = watch::channel(0);
        Self { pool, changed }
    }

    fn notify(&self) {
        self.changed.send_modify(|generation| *generation += 1);
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn observe_all(&self) -> BoxStream<'static, Vec<Task>> {
        let pool = self.pool.clone();
        let mut rx = self.changed.subscribe();

        Box::pin(async_stream::stream! {
            loop {
                match db::list_tasks(&pool).await {
                    Ok(tasks) => yield tasks,
                    // Skip this generation; the stream stays alive and
                    // picks up again on the next change.
                    Err(err) => warn!(error = %err, "live query snapshot failed"),
                }

                // Sender gone means the store itself was dropped.
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    async fn insert(&self, task: Task) -> Result<(), StoreError> {
        db::insert_task(&self.pool, &task).await?;
        self.notify();
        Ok(())
    }

    async fn update(&self, task: Task) -> Result<(), StoreError> {
        db::update_task(&self.pool, &task).await?;
        self.notify();
        Ok(())
    }

    async fn delete(&self, task: Task) -> Result<(), StoreError> {
        db::delete_task(&self.pool, &task).await?;
        self.notify();
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        db::delete_all_tasks(&self.pool).await?;
        self.notify();
        Ok(())
    }
}
