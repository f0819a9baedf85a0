use thiserror::Error;

/// Errors raised by session storage, naming, and auth resolution.
///
/// There are no retries anywhere in this crate: every operation is local
/// and synchronous, and either fully succeeds or fails once.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file does not exist yet. [`Session::load`] converts
    /// this into an empty session rather than surfacing it.
    ///
    /// [`Session::load`]: crate::session::Session::load
    #[error("session file not found: {path}")]
    StorageNotFound { path: String },

    /// The session file exists but could not be parsed. Fatal for the
    /// invocation; a corrupted session file is never auto-repaired.
    #[error("invalid session file {path}: {message}")]
    StorageParse { path: String, message: String },

    /// The stored auth descriptor names a scheme the registry does not
    /// know.
    #[error("unknown auth type {0:?}")]
    UnknownAuthType(String),

    /// A caller-supplied auth descriptor had the wrong shape. Exactly the
    /// keys `type` and `raw_auth` are accepted.
    #[error("invalid auth descriptor: expected exactly the keys \"type\" and \"raw_auth\"")]
    InvalidAuthDescriptor,

    /// An auth capability was asked to build a credential without the
    /// inputs it needs.
    #[error("missing auth credentials")]
    MissingAuthCredentials,

    /// Named sessions are restricted to `[A-Za-z0-9_.-]`. Path-based
    /// (anonymous) session names bypass this check.
    #[error("invalid session name {0:?}")]
    InvalidSessionName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
