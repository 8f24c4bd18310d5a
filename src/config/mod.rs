/// Configuration subsystem - Editor settings and preferences
///
/// This module handles loading configuration from .notasrc files, giving the
/// dispatcher its timer delays and the view its display settings.

pub mod rc;

// Re-export public interface
pub use rc::{ConfigError, MAX_FONT_SIZE, MIN_FONT_SIZE, RcConfig, RcLoader, Timings};
