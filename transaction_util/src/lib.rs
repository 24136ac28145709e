#![deny(missing_docs)]
//! Utilities for handling transactions: deriving one-time keys for recipients, signing
//! inputs and recognizing owned outputs

pub mod address;
mod derivation;
#[cfg(test)]
mod test_definitions;
pub mod tx_construction;
pub mod tx_scanning;
pub mod tx_signing;

pub use address::{Address, PublicAddress};
pub use derivation::{
    derive_ghost_private_key, derive_ghost_public_key, view_ghost_output_key, Derivation,
};
