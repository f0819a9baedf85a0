//! Header containers and the session merge rules.

pub mod headers;
pub mod merge;

pub use headers::{RequestHeaders, SessionHeaders};
pub use merge::{merge_request_headers, MergePolicy};
