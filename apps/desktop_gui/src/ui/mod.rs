//! UI layer for desktop GUI: the reorderable list window.

pub mod app;

pub use app::DesktopGuiApp;
