use common::Input;
use crypto::Hash256;

/// Type alias for the Result returned from functions in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for UTXO store operations
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    /// Returned when another transaction holds an unexpired lock on the output
    #[error("Input {input} is locked by transaction {lock_hash}")]
    Locked {
        /// The contended output
        input: Input,
        /// Transaction holding the lock
        lock_hash: Hash256,
    },

    /// Returned when an output exists in the set when it shouldn't
    #[error("Output {0} exists in the UTXO set")]
    Exists(Input),

    /// Returned when an output does not exist in the set when it should
    #[error("Output {0} does not exist in the UTXO set")]
    DoesNotExist(Input),

    /// Returned when a thread panicked while holding the store
    #[error("UTXO store is poisoned")]
    Poisoned,
}
