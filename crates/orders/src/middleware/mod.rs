//! Request middleware for the order service.

pub mod auth;

pub use auth::{RequireAuth, token_trust};
