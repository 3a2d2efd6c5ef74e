//! Business services for the identity service.

pub mod auth;
