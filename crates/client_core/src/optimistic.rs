//! Client-side view of the item list with optimistic moves.
//!
//! A move is applied locally as soon as the drag ends. The pre-move list is
//! kept until the server answers: success replaces the list with the server's
//! copy, failure restores the snapshot.

use shared::{
    domain::{Item, ItemId},
    protocol::ReorderRequest,
    reorder::{reindex, ReindexError},
};
use tracing::{info, warn};

use crate::{
    error::{ClientError, ListError},
    ItemsApi,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingMove {
    request: ReorderRequest,
    snapshot: Vec<Item>,
}

#[derive(Debug, Clone, Default)]
pub struct OptimisticList {
    items: Vec<Item>,
    pending: Option<PendingMove>,
}

impl OptimisticList {
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort_by_key(|item| item.order);
        Self {
            items,
            pending: None,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_syncing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_request(&self) -> Option<&ReorderRequest> {
        self.pending.as_ref().map(|pending| &pending.request)
    }

    pub fn index_of(&self, id: &ItemId) -> Option<u32> {
        self.items
            .iter()
            .position(|item| &item.id == id)
            .and_then(|index| u32::try_from(index).ok())
    }

    /// Replaces the list with a fresh copy from the server, dropping any pending move.
    pub fn replace(&mut self, items: Vec<Item>) {
        *self = Self::new(items);
    }

    /// Applies a move locally and returns the request to send, or `None` when
    /// the item is already at `to_index`.
    pub fn begin_move(
        &mut self,
        id: &ItemId,
        to_index: u32,
    ) -> Result<Option<ReorderRequest>, ListError> {
        if self.pending.is_some() {
            return Err(ListError::SyncInProgress);
        }
        let from_index = self
            .index_of(id)
            .ok_or_else(|| ReindexError::ItemNotFound(id.clone()))?;
        if from_index == to_index {
            return Ok(None);
        }

        let moved = reindex(&self.items, id, from_index, to_index)?;
        let request = ReorderRequest::new(id.clone(), from_index, to_index);
        let snapshot = std::mem::replace(&mut self.items, moved);
        self.pending = Some(PendingMove {
            request: request.clone(),
            snapshot,
        });
        Ok(Some(request))
    }

    /// Accepts the server's collection after a successful reorder.
    pub fn confirm(&mut self, server_items: Vec<Item>) {
        self.pending = None;
        if !server_items.is_empty() {
            self.items = server_items;
            self.items.sort_by_key(|item| item.order);
        }
    }

    /// Restores the list as it was before the pending move. Returns false when
    /// nothing was pending.
    pub fn rollback(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.items = pending.snapshot;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug)]
pub enum DragOutcome {
    /// No drop target, or dropped onto itself.
    Ignored,
    Synced,
    RolledBack(ClientError),
}

/// Handles the end of a drag of `active` onto `over`: applies the move
/// locally, sends it, and rolls back if the server call fails.
pub async fn drag_end<A: ItemsApi + ?Sized>(
    api: &A,
    list: &mut OptimisticList,
    active: &ItemId,
    over: Option<&ItemId>,
) -> Result<DragOutcome, ListError> {
    let Some(over) = over else {
        return Ok(DragOutcome::Ignored);
    };
    if active == over {
        return Ok(DragOutcome::Ignored);
    }
    let to_index = list
        .index_of(over)
        .ok_or_else(|| ReindexError::ItemNotFound(over.clone()))?;

    let Some(request) = list.begin_move(active, to_index)? else {
        return Ok(DragOutcome::Ignored);
    };

    match api.reorder(&request).await {
        Ok(response) => {
            list.confirm(response.items);
            info!(moved_item_id = %request.moved_item_id, "reorder synced");
            Ok(DragOutcome::Synced)
        }
        Err(err) => {
            warn!(moved_item_id = %request.moved_item_id, error = %err, "reorder failed; rolling back");
            list.rollback();
            Ok(DragOutcome::RolledBack(err))
        }
    }
}
