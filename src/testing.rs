use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::context::{AppContext, Session};
use crate::domain::task::{Task, TaskStatus};
use crate::domain::ticket::TicketRequest;
use crate::domain::user::User;
use crate::error::{AppError, AppResult};
use crate::form::project::default_coordinators;
use crate::services::{Acknowledgement, Notification, Notifier, TicketApi};
use crate::store::BoardStore;

pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CreateTicket {
        token: String,
        path: String,
        body: serde_json::Value,
    },
    MoveTask {
        token: String,
        path: String,
        status: String,
    },
    FetchTasks {
        token: String,
        path: String,
    },
    FetchUsers {
        token: String,
    },
}

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(&'static str),
    Reject(Option<&'static str>),
    Unreachable,
    /// Never answers.
    Hang,
}

impl Reply {
    fn into_result(self) -> AppResult<Acknowledgement> {
        match self {
            Reply::Ok(message) => Ok(Acknowledgement::new(message)),
            Reply::Reject(message) => Err(AppError::Rejected {
                status: Some(400),
                message: message.map(str::to_string),
            }),
            Reply::Unreachable | Reply::Hang => {
                Err(AppError::Transport("connection refused".to_string()))
            }
        }
    }
}

pub struct FakeTicketApi {
    pub calls: Mutex<Vec<ApiCall>>,
    pub completed_fetches: Mutex<Vec<TaskStatus>>,
    create_reply: Mutex<Reply>,
    move_reply: Mutex<Reply>,
    buckets: Mutex<HashMap<TaskStatus, Vec<Task>>>,
    failing_buckets: Mutex<Vec<TaskStatus>>,
    fetch_yields: Mutex<HashMap<TaskStatus, usize>>,
    users: Mutex<Vec<User>>,
    on_move: Mutex<Option<Arc<BoardStore>>>,
}

impl FakeTicketApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            completed_fetches: Mutex::new(Vec::new()),
            create_reply: Mutex::new(Reply::Ok("Ticket created")),
            move_reply: Mutex::new(Reply::Ok("Task moved")),
            buckets: Mutex::new(HashMap::new()),
            failing_buckets: Mutex::new(Vec::new()),
            fetch_yields: Mutex::new(HashMap::new()),
            users: Mutex::new(Vec::new()),
            on_move: Mutex::new(None),
        }
    }

    pub fn reply_to_create(&self, reply: Reply) {
        *self.create_reply.lock().unwrap() = reply;
    }

    pub fn reply_to_move(&self, reply: Reply) {
        *self.move_reply.lock().unwrap() = reply;
    }

    pub fn set_bucket(&self, status: TaskStatus, tasks: Vec<Task>) {
        self.buckets.lock().unwrap().insert(status, tasks);
    }

    pub fn fail_bucket(&self, status: TaskStatus) {
        self.failing_buckets.lock().unwrap().push(status);
    }

    /// Makes a bucket fetch yield to the runtime `count` times before answering.
    pub fn delay_bucket(&self, status: TaskStatus, count: usize) {
        self.fetch_yields.lock().unwrap().insert(status, count);
    }

    pub fn set_users(&self, users: Vec<User>) {
        *self.users.lock().unwrap() = users;
    }

    /// Detaches the given store as soon as a move request is received.
    pub fn detach_on_move(&self, store: Arc<BoardStore>) {
        *self.on_move.lock().unwrap() = Some(store);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TicketApi for FakeTicketApi {
    async fn create_ticket(
        &self,
        token: &str,
        request: &TicketRequest,
    ) -> AppResult<Acknowledgement> {
        self.record(ApiCall::CreateTicket {
            token: token.to_string(),
            path: request.endpoint().to_string(),
            body: request.to_json(),
        });
        let reply = self.create_reply.lock().unwrap().clone();
        if matches!(reply, Reply::Hang) {
            std::future::pending::<()>().await;
        }
        reply.into_result()
    }

    async fn move_task(
        &self,
        token: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> AppResult<Acknowledgement> {
        self.record(ApiCall::MoveTask {
            token: token.to_string(),
            path: format!("/tasks/move/{task_id}"),
            status: status.as_wire().to_string(),
        });
        if let Some(store) = self.on_move.lock().unwrap().as_ref() {
            store.detach();
        }
        let reply = self.move_reply.lock().unwrap().clone();
        reply.into_result()
    }

    async fn fetch_tasks(&self, token: &str, status: TaskStatus) -> AppResult<Vec<Task>> {
        self.record(ApiCall::FetchTasks {
            token: token.to_string(),
            path: status.fetch_path().to_string(),
        });

        let yields = self
            .fetch_yields
            .lock()
            .unwrap()
            .get(&status)
            .copied()
            .unwrap_or(0);
        for _ in 0..yields {
            tokio::task::yield_now().await;
        }
        self.completed_fetches.lock().unwrap().push(status);

        if self.failing_buckets.lock().unwrap().contains(&status) {
            return Err(AppError::Rejected {
                status: Some(500),
                message: Some(format!("cannot list {}", status.fetch_path())),
            });
        }
        Ok(self
            .buckets
            .lock()
            .unwrap()
            .get(&status)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_users(&self, token: &str) -> AppResult<Vec<User>> {
        self.record(ApiCall::FetchUsers {
            token: token.to_string(),
        });
        Ok(self.users.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        api_base_url: Some("https://desk.test".to_string()),
        api_token: Some(TOKEN.to_string()),
        project_coordinators: default_coordinators(),
        reset_on_error: true,
    }
}

pub struct Harness {
    pub ctx: AppContext,
    pub api: Arc<FakeTicketApi>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness() -> Harness {
    harness_with(test_config())
}

pub fn harness_with(config: AppConfig) -> Harness {
    let api = Arc::new(FakeTicketApi::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let session = Session::new(config.api_token.clone());
    let ctx = AppContext::new(
        config,
        session,
        api.clone(),
        notifier.clone(),
        Arc::new(BoardStore::new()),
    );
    Harness { ctx, api, notifier }
}
