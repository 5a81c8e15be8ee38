//! State transitions for the list view. Each transition may ask for one
//! backend command; the caller queues it.

use client_core::{ListError, OptimisticList};
use shared::domain::ItemId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

#[derive(Debug, Default)]
pub struct ListState {
    pub list: OptimisticList,
    pub loading: bool,
    pub error: Option<UiError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Reload,
    /// `active` was released over the row holding `over`.
    Drop { active: ItemId, over: ItemId },
    MoveTo { id: ItemId, to_index: u32 },
    DismissError,
}

pub fn apply_action(state: &mut ListState, action: UiAction) -> Option<BackendCommand> {
    match action {
        UiAction::Reload => {
            if state.list.is_syncing() {
                return None;
            }
            state.loading = true;
            Some(BackendCommand::Load)
        }
        UiAction::Drop { active, over } => {
            if active == over {
                return None;
            }
            let to_index = state.list.index_of(&over)?;
            begin_move(state, &active, to_index)
        }
        UiAction::MoveTo { id, to_index } => begin_move(state, &id, to_index),
        UiAction::DismissError => {
            state.error = None;
            None
        }
    }
}

fn begin_move(state: &mut ListState, id: &ItemId, to_index: u32) -> Option<BackendCommand> {
    match state.list.begin_move(id, to_index) {
        Ok(Some(request)) => {
            state.error = None;
            Some(BackendCommand::Reorder(request))
        }
        Ok(None) | Err(ListError::SyncInProgress) => None,
        Err(err) => {
            state.error = Some(UiError::from_message(
                UiErrorContext::General,
                err.to_string(),
            ));
            None
        }
    }
}

pub fn apply_event(state: &mut ListState, event: UiEvent) -> Option<BackendCommand> {
    match event {
        UiEvent::ItemsLoaded(items) => {
            state.loading = false;
            state.list.replace(items);
            None
        }
        UiEvent::ReorderConfirmed(items) => {
            state.list.confirm(items);
            None
        }
        UiEvent::ReorderFailed(err) => {
            state.list.rollback();
            let reload = err.wants_reload();
            state.error = Some(err);
            if reload {
                state.loading = true;
                Some(BackendCommand::Load)
            } else {
                None
            }
        }
        UiEvent::Error(err) => {
            state.loading = false;
            state.error = Some(err);
            None
        }
    }
}
