use async_trait::async_trait;
use shared::{
    domain::Item,
    protocol::{ReorderRequest, ReorderResponse},
};

pub mod error;
pub mod optimistic;
pub mod transport;

pub use error::{ClientError, ListError};
pub use optimistic::{drag_end, DragOutcome, OptimisticList};
pub use transport::HttpItemsClient;

/// Remote item collection.
#[async_trait]
pub trait ItemsApi: Send + Sync {
    async fn list_items(&self) -> Result<Vec<Item>, ClientError>;
    async fn reorder(&self, request: &ReorderRequest) -> Result<ReorderResponse, ClientError>;
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
