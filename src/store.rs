use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::task::{Task, TaskBoard, TaskStatus};
use crate::domain::user::User;

/// Shared cache of remote reference data. The workflows are the only writers;
/// views read snapshots.
///
/// Once a view detaches, results of calls still in flight are discarded
/// instead of being written into a cache nobody renders.
pub struct BoardStore {
    board: RwLock<TaskBoard>,
    users: RwLock<Vec<User>>,
    attached: AtomicBool,
}

impl BoardStore {
    pub fn new() -> Self {
        Self {
            board: RwLock::new(TaskBoard::default()),
            users: RwLock::new(Vec::new()),
            attached: AtomicBool::new(true),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::Release);
    }

    pub async fn board(&self) -> TaskBoard {
        self.board.read().await.clone()
    }

    pub async fn users(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    /// Returns `false` when the write was dropped because the store is detached.
    pub async fn replace_bucket(&self, status: TaskStatus, tasks: Vec<Task>) -> bool {
        if !self.is_attached() {
            debug!(
                bucket = status.as_wire(),
                "store detached; dropping late bucket update"
            );
            return false;
        }

        let mut board = self.board.write().await;
        // A detach may land while waiting for the lock.
        if !self.is_attached() {
            debug!(
                bucket = status.as_wire(),
                "store detached; dropping late bucket update"
            );
            return false;
        }
        board.replace(status, tasks);
        true
    }

    pub async fn set_users(&self, users: Vec<User>) -> bool {
        if !self.is_attached() {
            debug!("store detached; dropping late user directory update");
            return false;
        }
        let mut current = self.users.write().await;
        if !self.is_attached() {
            debug!("store detached; dropping late user directory update");
            return false;
        }
        *current = users;
        true
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}
