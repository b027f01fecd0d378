use std::future::Future;
use std::io;

use clap::{Args, Subcommand};
use tracing::warn;

use crate::context::AppContext;
use crate::domain::task::TaskStatus;
use crate::error::{AppError, AppResult};
use crate::store::BoardStore;
use crate::view::render_board;
use crate::workflow::board::{
    DragItem, DropOutcome, DropTarget, RefreshReport, handle_drop, refresh_board,
};

#[derive(Args, Debug, Clone)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub command: BoardCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum BoardCommand {
    /// Fetch and print the todo, in-progress and done columns.
    Show,
    /// Drop a task onto a column.
    Move {
        /// Task id.
        id: String,
        /// Target column: todo, ongoing or done.
        #[arg(long, default_value = "ongoing")]
        to: String,
    },
}

pub async fn run(ctx: &AppContext, command: BoardCommand) -> AppResult<bool> {
    let interrupt = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    let work = execute(ctx.clone(), command);
    match until_interrupted(&ctx.store, work, interrupt).await? {
        Some(succeeded) => Ok(succeeded),
        None => {
            eprintln!("Interrupted; board updates still in flight were discarded.");
            Ok(false)
        }
    }
}

/// Runs board work on its own task. An interrupt detaches the store, so
/// fetches that are still in flight cannot write into it afterwards.
async fn until_interrupted<W, I>(
    store: &BoardStore,
    work: W,
    interrupt: I,
) -> AppResult<Option<bool>>
where
    W: Future<Output = AppResult<bool>> + Send + 'static,
    I: Future<Output = ()>,
{
    let mut task = tokio::spawn(work);
    tokio::select! {
        biased;
        joined = &mut task => match joined {
            Ok(result) => result.map(Some),
            Err(error) => Err(AppError::Io(io::Error::other(error))),
        },
        _ = interrupt => {
            store.detach();
            warn!("interrupted; detaching board store");
            Ok(None)
        }
    }
}

async fn execute(ctx: AppContext, command: BoardCommand) -> AppResult<bool> {
    let ctx = &ctx;
    match command {
        BoardCommand::Show => {
            let report = refresh_board(ctx).await?;
            print!("{}", render_board(&ctx.store.board().await));
            report_stale(&report);
            Ok(report.is_complete())
        }
        BoardCommand::Move { id, to } => {
            let status = TaskStatus::from_str(&to).ok_or_else(|| {
                AppError::validation("to", format!("'{to}' is not one of: todo, ongoing, done"))
            })?;
            // Populate the cache first so the move reports where the task came from.
            refresh_board(ctx).await?;
            move_task(ctx, &id, status).await
        }
    }
}

async fn move_task(ctx: &AppContext, id: &str, status: TaskStatus) -> AppResult<bool> {
    let target = DropTarget::columns()
        .into_iter()
        .find(|column| column.status == status)
        .unwrap_or_else(|| DropTarget::new(status));
    match handle_drop(ctx, target, &DragItem::task(id)).await? {
        DropOutcome::Moved {
            transition,
            refresh,
        } => {
            let from = transition
                .from
                .map(|origin| origin.column_title())
                .unwrap_or("unknown column");
            println!("Moved {id} from {from} to {}.", target.title());
            print!("{}", render_board(&ctx.store.board().await));
            report_stale(&refresh);
            Ok(true)
        }
        DropOutcome::Failed { error } => {
            if error.server_message().is_none() {
                eprintln!("Task was not moved: {error}");
            }
            Ok(false)
        }
        DropOutcome::Ignored => Ok(false),
    }
}

fn report_stale(report: &RefreshReport) {
    for status in &report.stale {
        eprintln!(
            "Warning: could not refresh '{}'; showing cached tasks.",
            status.column_title()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::task;
    use crate::testing::{ApiCall, harness};

    #[tokio::test]
    async fn interrupt_detaches_store_before_refetch_lands() {
        let h = harness();
        h.api.set_bucket(TaskStatus::Ongoing, vec![task("T1", "a")]);
        let work = {
            let ctx = h.ctx.clone();
            async move { refresh_board(&ctx).await.map(|report| report.is_complete()) }
        };

        let outcome = until_interrupted(&h.ctx.store, work, std::future::ready(()))
            .await
            .unwrap();
        assert_eq!(outcome, None);
        assert!(!h.ctx.store.is_attached());

        // Let the abandoned refresh run to completion.
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        let fetches = h
            .api
            .calls()
            .into_iter()
            .filter(|call| matches!(call, ApiCall::FetchTasks { .. }))
            .count();
        assert_eq!(fetches, 3);
        assert!(h.ctx.store.board().await.is_empty());
    }

    #[tokio::test]
    async fn finished_work_is_returned_without_detaching() {
        let h = harness();
        let work = {
            let ctx = h.ctx.clone();
            async move { refresh_board(&ctx).await.map(|report| report.is_complete()) }
        };

        let outcome = until_interrupted(&h.ctx.store, work, std::future::pending())
            .await
            .unwrap();
        assert_eq!(outcome, Some(true));
        assert!(h.ctx.store.is_attached());
    }

    #[tokio::test]
    async fn move_command_drops_task_on_named_column() {
        let h = harness();
        h.api.set_bucket(TaskStatus::Todo, vec![task("T1", "a")]);

        let moved = execute(
            h.ctx.clone(),
            BoardCommand::Move {
                id: "T1".to_string(),
                to: "done".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(moved);
        assert!(h.api.calls().contains(&ApiCall::MoveTask {
            token: crate::testing::TOKEN.to_string(),
            path: "/tasks/move/T1".to_string(),
            status: "DONE".to_string(),
        }));
    }
}
