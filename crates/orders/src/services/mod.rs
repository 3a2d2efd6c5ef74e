//! Business services for the order service.

pub mod checkout;

pub use checkout::{CartLine, CheckoutError, CheckoutService};
