//! Request middleware for the identity service.

pub mod auth;

pub use auth::{RequireAuth, token_trust};
