//! Backend commands queued from UI to backend worker.

use shared::protocol::ReorderRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Load,
    Reorder(ReorderRequest),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Load => "load",
            BackendCommand::Reorder(_) => "reorder",
        }
    }
}
