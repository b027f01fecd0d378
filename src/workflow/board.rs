use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::domain::task::{TaskStatus, Transition};
use crate::error::{AppError, AppResult};

/// Drag item type accepted by board columns.
pub const TASK_ITEM: &str = "task";

const DEFAULT_MOVE_MESSAGE: &str = "Task moved";

/// Payload carried by a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragItem {
    pub item_type: String,
    pub id: String,
}

impl DragItem {
    pub fn task(id: impl Into<String>) -> Self {
        Self {
            item_type: TASK_ITEM.to_string(),
            id: id.into(),
        }
    }
}

/// A board column. Dropping a task onto it moves the task to the column's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub status: TaskStatus,
}

impl DropTarget {
    pub fn new(status: TaskStatus) -> Self {
        Self { status }
    }

    pub fn columns() -> [DropTarget; 3] {
        TaskStatus::ALL.map(DropTarget::new)
    }

    pub fn title(&self) -> &'static str {
        self.status.column_title()
    }

    pub fn accepts(&self, item: &DragItem) -> bool {
        item.item_type == TASK_ITEM
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub refreshed: Vec<TaskStatus>,
    pub stale: Vec<TaskStatus>,
    /// Buckets fetched after the store detached; their results were dropped.
    pub dropped: Vec<TaskStatus>,
    /// Task ids found in more than one bucket once every bucket was refreshed.
    pub overlaps: Vec<String>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.stale.is_empty() && self.dropped.is_empty()
    }
}

#[derive(Debug)]
pub enum DropOutcome {
    /// The dragged item is not something this target accepts.
    Ignored,
    Moved {
        transition: Transition,
        refresh: RefreshReport,
    },
    Failed {
        error: AppError,
    },
}

/// Handles a drop on a column: one move request, then on success a
/// re-fetch of all three buckets. A failed move leaves the board untouched.
pub async fn handle_drop(
    ctx: &AppContext,
    target: DropTarget,
    item: &DragItem,
) -> AppResult<DropOutcome> {
    if !target.accepts(item) {
        debug!(item_type = %item.item_type, "drop ignored");
        return Ok(DropOutcome::Ignored);
    }

    let token = ctx.session.bearer()?;
    let transition = ctx.store.board().await.transition(&item.id, target.status);
    if transition.is_noop() {
        debug!(task = %item.id, "task dropped onto its current column");
    }

    match ctx.api.move_task(token, &item.id, target.status).await {
        Ok(ack) => {
            info!(
                task = %transition.task_id,
                from = transition.from.map(|status| status.as_wire()).unwrap_or("?"),
                to = transition.to.as_wire(),
                "task moved"
            );
            ctx.notifier.success(ack.message_or(DEFAULT_MOVE_MESSAGE));
            let refresh = refresh_board(ctx).await?;
            Ok(DropOutcome::Moved {
                transition,
                refresh,
            })
        }
        Err(error) => {
            match error.server_message() {
                Some(message) => ctx.notifier.error(message),
                None => warn!(task = %item.id, %error, "move failed without a server message"),
            }
            Ok(DropOutcome::Failed { error })
        }
    }
}

/// Fetches the todo, ongoing and done buckets concurrently. Each bucket is
/// replaced as soon as its own fetch resolves; a failed fetch leaves that
/// bucket as it was.
///
/// Buckets are only checked for shared ids after all three have landed,
/// since a task that just moved sits in two buckets until the slower fetch
/// resolves.
pub async fn refresh_board(ctx: &AppContext) -> AppResult<RefreshReport> {
    let token = ctx.session.bearer()?;

    let (todo, ongoing, done) = tokio::join!(
        refresh_bucket(ctx, token, TaskStatus::Todo),
        refresh_bucket(ctx, token, TaskStatus::Ongoing),
        refresh_bucket(ctx, token, TaskStatus::Done),
    );

    let mut report = RefreshReport::default();
    for (status, result) in [
        (TaskStatus::Todo, todo),
        (TaskStatus::Ongoing, ongoing),
        (TaskStatus::Done, done),
    ] {
        match result {
            Ok(true) => report.refreshed.push(status),
            Ok(false) => report.dropped.push(status),
            Err(error) => {
                warn!(bucket = status.fetch_path(), %error, "bucket refresh failed; keeping cached tasks");
                report.stale.push(status);
            }
        }
    }

    if report.refreshed.len() == TaskStatus::ALL.len() {
        report.overlaps = ctx.store.board().await.overlapping_ids();
        if !report.overlaps.is_empty() {
            warn!(overlaps = ?report.overlaps, "tasks reported in more than one status bucket");
        }
    }
    Ok(report)
}

async fn refresh_bucket(ctx: &AppContext, token: &str, status: TaskStatus) -> AppResult<bool> {
    let tasks = ctx.api.fetch_tasks(token, status).await?;
    debug!(bucket = status.fetch_path(), count = tasks.len(), "bucket fetched");
    Ok(ctx.store.replace_bucket(status, tasks).await)
}

/// Loads the user directory used by assignee selectors.
pub async fn load_users(ctx: &AppContext) -> AppResult<usize> {
    let token = ctx.session.bearer()?;
    let users = ctx.api.fetch_users(token).await?;
    let count = users.len();
    ctx.store.set_users(users).await;
    Ok(count)
}
