use shared::{
    domain::Item,
    error::{ApiError, ErrorCode},
    protocol::{ReorderRequest, ReorderResponse},
    reorder::ReindexError,
};
use storage::Storage;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

impl ApiContext {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

pub async fn health(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.storage.health_check().await.map_err(|err| {
        warn!(error = %err, "storage health check failed");
        ApiError::new(ErrorCode::Unavailable, err.to_string())
    })
}

pub async fn list_items(ctx: &ApiContext) -> Result<Vec<Item>, ApiError> {
    ctx.storage.list_items().await.map_err(internal)
}

pub async fn reorder_items(
    ctx: &ApiContext,
    req: &ReorderRequest,
) -> Result<ReorderResponse, ApiError> {
    if req.moved_item_id.as_str().trim().is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "movedItemId must not be empty",
        ));
    }

    info!(
        moved_item_id = %req.moved_item_id,
        from_index = req.from_index,
        to_index = req.to_index,
        "reordering item"
    );

    let items = ctx
        .storage
        .reorder_item(&req.moved_item_id, req.from_index, req.to_index)
        .await
        .map_err(reorder_failure)?;
    Ok(ReorderResponse::success(items))
}

fn reorder_failure(err: anyhow::Error) -> ApiError {
    match err.downcast::<ReindexError>() {
        Ok(rejection) => {
            let api_error = ApiError::from(rejection);
            if matches!(api_error.code, ErrorCode::Internal) {
                error!(message = %api_error.message, "stored collection rejected a move");
            }
            api_error
        }
        Err(err) => internal(err),
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    error!(error = %format!("{err:#}"), "item request failed");
    ApiError::new(ErrorCode::Internal, "internal error")
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
