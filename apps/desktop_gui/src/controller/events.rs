//! UI/backend events and error modeling for desktop GUI controller.

use client_core::ClientError;
use shared::{domain::Item, error::ErrorCode};

#[derive(Debug)]
pub enum UiEvent {
    ItemsLoaded(Vec<Item>),
    ReorderConfirmed(Vec<Item>),
    ReorderFailed(UiError),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    /// The server's list no longer matches ours.
    Stale,
    Validation,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Load,
    Reorder,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Server,
            context,
            message: message.into(),
        }
    }

    pub fn from_client(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport(_) => UiErrorCategory::Transport,
            ClientError::InvalidUrl { .. } => UiErrorCategory::Validation,
            _ => match err.code() {
                Some(ErrorCode::NotFound | ErrorCode::Conflict) => UiErrorCategory::Stale,
                Some(ErrorCode::Validation) => UiErrorCategory::Validation,
                Some(ErrorCode::Unavailable) => UiErrorCategory::Transport,
                Some(ErrorCode::Internal) | None => UiErrorCategory::Server,
            },
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Whether the list should be fetched again after this error.
    pub fn wants_reload(&self) -> bool {
        self.category == UiErrorCategory::Stale
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn banner_text(&self) -> String {
        let prefix = match self.context {
            UiErrorContext::BackendStartup => "Backend unavailable",
            UiErrorContext::Load => "Could not load items",
            UiErrorContext::Reorder => "Move was undone",
            UiErrorContext::General => "Error",
        };
        format!("{prefix}: {}", self.message)
    }
}
