//! The warning sink injected by the host client.
//!
//! The security advisor's output is user-facing, so presentation belongs
//! to the CLI that embeds this crate. Internal diagnostics go through
//! `tracing` directly and are not part of this seam.

/// Severity attached to a sink message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Fire-and-forget message sink.
///
/// Implementations must not block or fail; a message is emitted at most
/// once with no retry or escalation.
pub trait LogSink {
    fn log(&self, message: &str, level: LogLevel);
}

/// Default sink routing through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str, level: LogLevel) {
        match level {
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warning => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}
