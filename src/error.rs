use std::io;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("ticket not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not permitted: {0}")]
    Forbidden(String),
    #[error("ticket store error: {message}")]
    TicketStore {
        status: Option<StatusCode>,
        message: String,
    },
    #[error("assignee directory error: {0}")]
    AssigneeDirectory(String),
    #[error("realtime channel error: {0}")]
    Realtime(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn ticket_store(message: impl Into<String>) -> Self {
        AppError::TicketStore {
            status: None,
            message: message.into(),
        }
    }

    /// Errors that send the viewer to the not-found page instead of the ticket.
    pub fn is_not_found(&self) -> bool {
        match self {
            AppError::NotFound(_) | AppError::BadRequest(_) => true,
            _ => false,
        }
    }

    /// HTTP status of a ticket store failure, when the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::TicketStore { status, .. } => *status,
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
