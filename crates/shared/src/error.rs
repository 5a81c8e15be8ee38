use serde::{Deserialize, Serialize};

use crate::reorder::ReindexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Conflict,
    Unavailable,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&ReindexError> for ErrorCode {
    fn from(value: &ReindexError) -> Self {
        match value {
            ReindexError::ItemNotFound(_) => ErrorCode::NotFound,
            ReindexError::PositionMismatch { .. } => ErrorCode::Conflict,
            ReindexError::IndexOutOfRange { .. } => ErrorCode::Validation,
            ReindexError::NotDense => ErrorCode::Internal,
        }
    }
}

impl From<ReindexError> for ApiError {
    fn from(value: ReindexError) -> Self {
        Self::new(ErrorCode::from(&value), value.to_string())
    }
}
