//! One-shot task commands: add, list, done, rename, rm, clear.
//!
//! Every command goes through the controller: reads observe the published
//! state (waiting out the loading default), mutations fire an intent and
//! then drain the controller so the process does not exit mid-write.

use anyhow::{Result, bail};

use ticklist_core::{TaskController, TaskListState};
use ticklist_db::models::Task;

/// Wait for the first live-query emission and return it.
async fn first_snapshot(ctrl: &TaskController) -> TaskListState {
    let mut watcher = ctrl.observe();
    watcher.wait_for(|state| !state.is_loading).await
}

/// Drain in-flight intents, then surface any store failure the controller
/// reported through the published state.
async fn finish(ctrl: &TaskController, done_msg: &str) -> Result<()> {
    ctrl.shutdown().await;
    if let Some(err) = ctrl.current_state().last_error {
        bail!("store operation failed: {err}");
    }
    println!("{done_msg}");
    Ok(())
}

/// Render a task list, one line per task.
pub fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in tasks {
        let mark = if task.is_done { "x" } else { " " };
        println!("[{mark}] {:>4}  {}", task.id, task.title);
    }
}

pub async fn cmd_add(ctrl: &TaskController, title: &str) -> Result<()> {
    // The add screen's validation lives here, not in the controller.
    if title.trim().is_empty() {
        bail!("task title must not be blank");
    }
    ctrl.add_task(title);
    finish(ctrl, "Added.").await
}

pub async fn cmd_list(ctrl: &TaskController, json: bool) -> Result<()> {
    let state = first_snapshot(ctrl).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&state.tasks)?);
    } else {
        print_tasks(&state.tasks);
    }
    Ok(())
}

pub async fn cmd_done(ctrl: &TaskController, id: i64) -> Result<()> {
    let state = first_snapshot(ctrl).await;
    let Some(task) = state.find(id) else {
        bail!("no task with id {id}");
    };
    let msg = if task.is_done {
        "Marked not done."
    } else {
        "Marked done."
    };
    ctrl.toggle_task_done(id);
    finish(ctrl, msg).await
}

pub async fn cmd_rename(ctrl: &TaskController, id: i64, title: &str) -> Result<()> {
    if title.trim().is_empty() {
        bail!("task title must not be blank");
    }
    let state = first_snapshot(ctrl).await;
    if state.find(id).is_none() {
        bail!("no task with id {id}");
    }
    ctrl.update_task_title(id, title);
    finish(ctrl, "Renamed.").await
}

pub async fn cmd_rm(ctrl: &TaskController, id: i64) -> Result<()> {
    let state = first_snapshot(ctrl).await;
    if state.find(id).is_none() {
        bail!("no task with id {id}");
    }
    ctrl.delete_task(id);
    finish(ctrl, "Deleted.").await
}

pub async fn cmd_clear(ctrl: &TaskController) -> Result<()> {
    ctrl.delete_all_tasks();
    finish(ctrl, "All tasks deleted.").await
}
