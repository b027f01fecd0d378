use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::services::{Notifier, TicketApi};
use crate::store::BoardStore;

/// Bearer credential issued by the external auth provider.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn bearer(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Configuration("API token not configured".to_string()))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub session: Session,
    pub api: Arc<dyn TicketApi>,
    pub notifier: Arc<dyn Notifier>,
    pub store: Arc<BoardStore>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        session: Session,
        api: Arc<dyn TicketApi>,
        notifier: Arc<dyn Notifier>,
        store: Arc<BoardStore>,
    ) -> Self {
        Self {
            config,
            session,
            api,
            notifier,
            store,
        }
    }
}
