//! Cookie storage and the on-disk cookie formats.
//!
//! - **Record**: a single stored cookie ([`SessionCookie`](record::SessionCookie))
//! - **Jar**: the ordered, mutable collection ([`CookieJar`](jar::CookieJar))
//! - **Wire codec**: conversion between the two historical on-disk
//!   layouts and the live jar ([`wire`])
//!
//! Session files have carried cookies in two incompatible shapes: a
//! legacy object keyed by cookie name (which could not express a
//! per-cookie domain) and the current list of records with an explicit
//! `domain` field. The wire codec accepts both, flags the insecure legacy
//! case, and writes back whichever shape the file already used so a save
//! never forces a format migration on its own.

pub mod jar;
pub mod record;
pub mod wire;

pub use jar::CookieJar;
pub use record::{SessionCookie, DEFAULT_COOKIE_PATH};
pub use wire::{CookieShape, DecodedCookies};
