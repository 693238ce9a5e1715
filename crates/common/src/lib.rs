//! Shared building blocks for the admin workspace.
//! - Wire types used by both the REST API and its HTTP client.
//! - Tracing bootstrap shared by binaries and tests.

pub mod types;
pub mod utils;
