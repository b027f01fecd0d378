use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid value for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    #[error("{}", rejection_text(.status, .message))]
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Message supplied by the server, if this error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

fn rejection_text(status: &Option<u16>, message: &Option<String>) -> String {
    match (status, message.as_deref()) {
        (Some(status), Some(message)) => format!("server rejected request ({status}): {message}"),
        (Some(status), None) => format!("server rejected request ({status})"),
        (None, Some(message)) => format!("server rejected request: {message}"),
        (None, None) => "server rejected request".to_string(),
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_ignores_blank_messages() {
        let blank = AppError::Rejected {
            status: Some(400),
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.server_message(), None);

        let transport = AppError::Transport("connection refused".to_string());
        assert_eq!(transport.server_message(), None);

        let rejected = AppError::Rejected {
            status: Some(422),
            message: Some("title is required".to_string()),
        };
        assert_eq!(rejected.server_message(), Some("title is required"));
        assert_eq!(
            rejected.to_string(),
            "server rejected request (422): title is required"
        );
    }
}
