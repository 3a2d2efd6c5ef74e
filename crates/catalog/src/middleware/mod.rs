//! Request middleware for the catalog service.

pub mod auth;

pub use auth::{RequireAdmin, token_trust};
