use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::task::{Task, TaskStatus};
use crate::domain::ticket::TicketRequest;
use crate::domain::user::User;
use crate::error::AppResult;

/// Body of a successful mutation: the backend echoes a human readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

impl Acknowledgement {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(fallback)
    }
}

/// Remote ticketing backend. Every call carries the caller's bearer token.
#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn create_ticket(
        &self,
        token: &str,
        request: &TicketRequest,
    ) -> AppResult<Acknowledgement>;
    async fn move_task(
        &self,
        token: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> AppResult<Acknowledgement>;
    async fn fetch_tasks(&self, token: &str, status: TaskStatus) -> AppResult<Vec<Task>>;
    async fn fetch_users(&self, token: &str) -> AppResult<Vec<User>>;
}
