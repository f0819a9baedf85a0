//! # sessionjar
//!
//! Persistent, JSON-serialized HTTP session state for command-line
//! clients.
//!
//! `sessionjar` stores the reusable parts of a request (headers, a
//! cookie jar, and an authentication choice) in a per-host session file
//! so a sequence of related requests can share state without
//! re-specifying it each time.
//!
//! ## Features
//!
//! - **Sessions**: named sessions filed per host, plus ad hoc
//!   path-based (anonymous) sessions
//! - **Cookie jar**: ordered, overwrite-by-(name, domain, path),
//!   explicit expiry pruning
//! - **Format compatibility**: reads both the legacy mapping cookie
//!   layout and the current list layout, preserves the file's shape on
//!   save, and warns when the legacy layout is insecure
//! - **Header merge**: folds request headers into the session while
//!   dropping per-request families such as `Content-*` and `If-*`
//! - **Pluggable auth**: named capabilities resolved through a registry;
//!   `basic` and `bearer` ship in the box
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use sessionjar::base::logging::TracingSink;
//! use sessionjar::http::headers::RequestHeaders;
//! use sessionjar::session::Session;
//!
//! fn main() -> Result<(), sessionjar::SessionError> {
//!     let sink = TracingSink;
//!     let mut session = Session::for_request(
//!         Path::new("/home/user/.config/client"),
//!         "api",
//!         None,
//!         "https://api.example.com/users",
//!         false,
//!         &sink,
//!     )?;
//!
//!     let mut headers = RequestHeaders::new();
//!     headers.push("Authorization", "token xyz");
//!     session.update_headers(&mut headers);
//!     session.save()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Errors and the injected warning sink
//! - [`cookies`] - Cookie records, the jar, and the on-disk codec
//! - [`http`] - Header containers and the merge rules
//! - [`auth`] - Auth descriptors, capability registry, bundled schemes
//! - [`session`] - The aggregate, its locator, and the security advisor
//! - [`store`] - Atomic JSON file persistence

pub mod auth;
pub mod base;
pub mod cookies;
pub mod http;
pub mod session;
pub mod store;

pub use base::error::SessionError;
pub use session::locator::SessionLocator;
pub use session::state::Session;
