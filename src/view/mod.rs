/// View subsystem - Terminal rendering and display management
///
/// This module draws the title, text area, assistant panel, status bar and
/// prompt row, independent of session internals through the ViewModel trait.

pub mod renderer;
pub mod view_model;

// Re-export public interface
pub use renderer::{RenderParams, View};
pub use view_model::{SessionViewModel, ViewModel};
