use serde::{Deserialize, Serialize};
use std::fmt;

/// Single structured error shape shared by the store, the classification
/// advisor, and the controllers.
///
/// `user_facing` marks errors whose message is meant for the end user
/// (validation and submission failures). Everything else degrades to a log
/// record plus stale-or-empty display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub user_facing: bool,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            user_facing: false,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_user_facing(mut self, user_facing: bool) -> Self {
        self.user_facing = user_facing;
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
