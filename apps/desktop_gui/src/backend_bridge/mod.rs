//! Worker thread that owns the HTTP client and talks to the item service.

pub mod commands;
pub mod runtime;
