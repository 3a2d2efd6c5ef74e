//! Domain models for the identity service.

pub mod user;

pub use user::User;
