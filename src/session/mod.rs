//! The session aggregate and its supporting pieces.
//!
//! - [`Session`](state::Session): the persisted bundle of headers,
//!   cookies, and auth choice, scoped to one command invocation
//! - [`SessionLocator`](locator::SessionLocator): on-disk identity for a
//!   (name, host) pair, named vs. anonymous placement
//! - [`advisor`]: the insecure legacy cookie layout warning

pub mod advisor;
pub mod locator;
pub mod state;

pub use locator::{host_of, is_anonymous_session, SessionLocator, SESSIONS_DIR_NAME};
pub use state::Session;
