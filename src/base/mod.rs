//! Base types and error handling.
//!
//! Provides the foundational pieces shared by every module:
//! - [`SessionError`]: the crate-wide error taxonomy
//! - [`LogSink`]: the injected sink for user-facing warnings

pub mod error;
pub mod logging;

pub use error::SessionError;
pub use logging::{LogLevel, LogSink, TracingSink};
