//! User interface module - replay logging and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `logger` - The replay logger every workflow writes to

pub mod formatter;
pub mod logger;

// Re-export formatter functions for convenience
pub use formatter::{display_error, display_status, display_success};
pub use logger::{LogEntry, LogLevel, ReplayLogger};
