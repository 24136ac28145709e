#![deny(missing_docs)]

//! # Transaction validation
//! This crate decides whether a signed transaction may spend its inputs, and pools the
//! transactions that may

mod config;
mod error;
#[cfg(test)]
mod test_definitions;
pub mod txpool;
pub mod validation;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use txpool::TXPool;
pub use validation::{count_valid_signatures, validate, TransactionValidator};
