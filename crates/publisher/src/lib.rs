//! Publisher client for the asset server.
//!
//! Collects exported files from a local directory layout, validates them per
//! family, and publishes them over the HTTP API. The sync agent mirrors
//! published packages by following the server's change feed.

pub mod client;
pub mod collect;
pub mod errors;
pub mod publish;
pub mod sync;
pub mod validate;

pub use client::ApiClient;
pub use errors::PublishError;
