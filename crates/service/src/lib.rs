//! Service layer providing business-oriented operations on top of models.
//! - Separates catalog logic (version assignment, deletes, change feed) from
//!   data access in `models`.
//! - Owns the filesystem layout, zip packaging and API-key roles.

pub mod auth;
pub mod catalog;
pub mod errors;
pub mod package;
pub mod pagination;
pub mod storage;
