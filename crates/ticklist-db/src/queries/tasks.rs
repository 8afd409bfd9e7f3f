//! Database query functions for the `tasks` table.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::Task;

/// Fetch every task, ordered by ascending id. This is the canonical order
/// the UI state exposes.
pub async fn list_tasks(pool: &SqlitePool) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>("SELECT id, title, is_done FROM tasks ORDER BY id ASC")
        .fetch_all(pool)
        .await
        .context("failed to list tasks")?;

    Ok(tasks)
}

/// Insert a task row.
///
/// A task with `id == 0` is treated as unpersisted: the id column is left
/// to SQLite, which assigns the next row id. A task carrying a concrete id
/// uses `INSERT OR IGNORE`, so a conflicting id is a silent no-op.
pub async fn insert_task(pool: &SqlitePool, task: &Task) -> Result<()> {
    if task.id == 0 {
        sqlx::query("INSERT INTO tasks (title, is_done) VALUES (?1, ?2)")
            .bind(&task.title)
            .bind(task.is_done)
            .execute(pool)
            .await
            .context("failed to insert task")?;
    } else {
        sqlx::query("INSERT OR IGNORE INTO tasks (id, title, is_done) VALUES (?1, ?2, ?3)")
            .bind(task.id)
            .bind(&task.title)
            .bind(task.is_done)
            .execute(pool)
            .await
            .context("failed to insert task")?;
    }

    Ok(())
}

/// Replace the stored row matching the task's id.
///
/// A missing row is a no-op, matching the stale-reference semantics the
/// controller relies on.
pub async fn update_task(pool: &SqlitePool, task: &Task) -> Result<()> {
    sqlx::query("UPDATE tasks SET title = ?1, is_done = ?2 WHERE id = ?3")
        .bind(&task.title)
        .bind(task.is_done)
        .bind(task.id)
        .execute(pool)
        .await
        .context("failed to update task")?;

    Ok(())
}

/// Delete the stored row matching the task's id. Missing rows are a no-op.
pub async fn delete_task(pool: &SqlitePool, task: &Task) -> Result<()> {
    sqlx::query("DELETE FROM tasks WHERE id = ?1")
        .bind(task.id)
        .execute(pool)
        .await
        .context("failed to delete task")?;

    Ok(())
}

/// Delete every task row.
pub async fn delete_all_tasks(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM tasks")
        .execute(pool)
        .await
        .context("failed to delete all tasks")?;

    Ok(())
}
