//! Clementine Core - Shared types library.
//!
//! This crate provides common types used across all Clementine services:
//! - `identity` - Token-issuing authentication service
//! - `catalog` - Product and stock service
//! - `orders` - Order service (checkout saga)
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere. The one piece of shared behavior is the [`token`] codec:
//! the HMAC-signed bearer tokens it produces are the only trust mechanism
//! between services, so issuer and verifiers must agree on one
//! implementation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and statuses
//! - [`token`] - Signed, time-bounded identity tokens
//! - [`principal`] - The authenticated identity derived from a verified token

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod principal;
pub mod token;
pub mod types;

pub use principal::Principal;
pub use token::{Claims, TokenCodec, TokenError, TokenType};
pub use types::*;
