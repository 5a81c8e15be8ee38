use shared::{
    error::{ApiError, ErrorCode},
    reorder::ReindexError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request ({status}): {}", .error.message)]
    Api { status: u16, error: ApiError },
    #[error("unexpected server response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

impl ClientError {
    /// Error code reported by the server, if the server answered at all.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { error, .. } => Some(error.code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("a reorder is already waiting for the server")]
    SyncInProgress,
    #[error(transparent)]
    Reindex(#[from] ReindexError),
}
