//! Live view: stream published-state snapshots until interrupted.

use anyhow::Result;
use futures::StreamExt;

use ticklist_core::TaskController;

use crate::task_cmds::print_tasks;

pub async fn cmd_watch(ctrl: &TaskController) -> Result<()> {
    let mut stream = ctrl.observe().into_stream();
    println!("Watching tasks (Ctrl-C to stop)...");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = stream.next() => match next {
                // Skip the loading default; render every real snapshot.
                Some(state) if !state.is_loading => {
                    println!("---");
                    print_tasks(&state.tasks);
                }
                Some(_) => {}
                None => break,
            },
        }
    }

    Ok(())
}
