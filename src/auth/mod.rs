//! Stored authentication choice and the capability registry.
//!
//! A session records at most one auth choice, in one of two historical
//! stanzas: the legacy clear-text username/password trio or the current
//! `{type, raw_auth}` pair that hands an opaque string to a named auth
//! capability. Resolution goes through an explicit name → provider
//! registry; `basic` and `bearer` ship as bundled capabilities, anything
//! else is supplied by the host client.

pub mod basic;
pub mod bearer;
pub mod descriptor;
pub mod registry;

pub use basic::BasicAuth;
pub use bearer::BearerAuth;
pub use descriptor::AuthDescriptor;
pub use registry::{parse_raw_credentials, AuthCredential, AuthProvider, AuthRegistry, Credentials};
