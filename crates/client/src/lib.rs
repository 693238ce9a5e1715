//! HTTP implementations of the service contracts and the composition root.
//!
//! [`ApiClient`] owns transport concerns (base URL, bearer token, envelope
//! unwrapping); `HttpCrud`, `HttpLinks`, `HttpPlanos` and `RemoteCredentials`
//! map each contract operation onto one REST endpoint. [`AdminContext`] builds
//! one shared instance of every service for the configured mode.

pub mod api;
pub mod context;
pub mod credentials;
pub mod crud;
pub mod links;
pub mod planos;

pub use api::ApiClient;
pub use context::AdminContext;
pub use credentials::RemoteCredentials;
pub use crud::HttpCrud;
pub use links::HttpLinks;
pub use planos::HttpPlanos;
