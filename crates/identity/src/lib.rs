//! Clementine Identity library.
//!
//! This crate provides the identity service as a library, allowing its
//! router and services to be exercised in-process by tests.
//!
//! The identity service owns user credentials and is the only issuer of the
//! HMAC-signed bearer tokens the rest of the fleet trusts. Verifiers never
//! call back here; possession of a token with a valid signature and a live
//! expiry is the whole story.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
