//! Clementine Orders library.
//!
//! This crate provides the order service as a library, allowing its router,
//! checkout saga, and catalog client to be exercised in-process by tests.
//!
//! The order service owns the checkout saga: it prices and reserves each
//! cart line against the remote catalog, then commits the order locally in
//! one transaction. There is no distributed transaction and no compensation;
//! the saga's failure semantics are spelled out in
//! [`services::checkout`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
