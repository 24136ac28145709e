#![deny(missing_docs)]

//! # UTXO storage
//! Backends for the UTXO set and the index of confirmed one-time keys

mod error;
mod mem;

pub use error::{Error, Result};
pub use mem::UTXOMemDB;
