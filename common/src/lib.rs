//! Transaction model shared by the signer, the validator and the UTXO store

pub mod codec;
pub mod config;
mod integer;
mod script;
mod traits;
mod transaction;
mod utxo;

pub use integer::{Integer, ParseIntegerError, PRECISION};
pub use script::{Script, ScriptError, OPERATOR_CMP, OPERATOR_SUM};
pub use traits::{GetHash, GhostChecker, PreliminaryChecks, UTXOLocker};
pub use transaction::{Input, InputType, Output, OutputType, SignedTransaction, Transaction};
pub use utxo::{Snapshot, UTXOWithLock, UTXO};
