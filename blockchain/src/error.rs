use common::{Input, Integer, ScriptError};
use crypto::{Hash256, Key};

/// Type alias for transaction validation results
pub type Result<T> = std::result::Result<T, Error>;

/// Reason a transaction was rejected
///
/// Validation stops at the first violation, so this is always the earliest failing check
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when the transaction version is not supported
    #[error("Invalid transaction version {0}")]
    InvalidVersion(u8),

    /// Returned when there is not exactly one signature list per input
    #[error("Invalid signatures count {signatures} {inputs}")]
    SignatureCount {
        /// Number of signature lists
        signatures: usize,
        /// Number of inputs
        inputs: usize,
    },

    /// Returned when the extra field is over its limit
    #[error("Invalid extra size {0}")]
    ExtraTooLarge(usize),

    /// Returned when the signed transaction encoding is over the maximum size
    #[error("Invalid transaction size {0}")]
    TransactionTooLarge(usize),

    /// Returned when an output key repeats within the transaction or is already known
    #[error("Invalid output key {0}")]
    DuplicateKey(Key),

    /// Returned when an input is referenced more than once
    #[error("Invalid input {0}")]
    DuplicateInput(Input),

    /// Returned when an input does not reference an unspent output
    #[error("Input not found {0}")]
    UnknownInput(Input),

    /// Returned when an input holds a different asset than the transaction
    #[error("Invalid input asset {found} {expected}")]
    AssetMismatch {
        /// Asset of the transaction
        expected: Hash256,
        /// Asset of the referenced output
        found: Hash256,
    },

    /// Returned when an input references an output that is not spendable by signature
    #[error("Invalid input type {0}")]
    WrongInputType(Input),

    /// Returned when an input's signatures do not satisfy its script
    #[error("Invalid signatures for input {input}: {source}")]
    SignatureThreshold {
        /// The offending input
        input: Input,
        /// Script failure
        source: ScriptError,
    },

    /// Returned when inputs and outputs do not carry the same value
    #[error("Invalid input output amount {inputs} {outputs}")]
    ValueMismatch {
        /// Sum of the inputs
        inputs: Integer,
        /// Sum of the outputs
        outputs: Integer,
    },

    /// Returned when an amount sum does not fit
    #[error("Amount overflow")]
    AmountOverflow,

    /// Returned when the UTXO locker fails, including lock contention
    #[error(transparent)]
    Locker(Box<dyn std::error::Error + Send + Sync>),

    /// Returned when the ghost key index fails
    #[error(transparent)]
    GhostChecker(Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of validation errors
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The transaction is structurally invalid
    Malformed,
    /// An output key repeats or is already known
    DuplicateKey,
    /// An input repeats within the transaction
    DuplicateInput,
    /// An input references an output that is unknown or already spent
    ///
    /// An input locked by another transaction is not classed here. The locker reports it
    /// and it surfaces as `Collaborator`
    UnknownInput,
    /// An input holds a different asset
    AssetMismatch,
    /// An input was not created by a script output
    WrongInputType,
    /// The signatures do not satisfy a script
    SignatureThresholdFailure,
    /// Inputs and outputs do not balance
    ValueMismatch,
    /// A collaborator failed
    ///
    /// This includes an input locked by another transaction whose lock has not expired,
    /// so a transaction rejected with this kind may pass on retry
    Collaborator,
}

impl Error {
    /// The class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidVersion(_)
            | Error::SignatureCount { .. }
            | Error::ExtraTooLarge(_)
            | Error::TransactionTooLarge(_) => ErrorKind::Malformed,
            Error::DuplicateKey(_) => ErrorKind::DuplicateKey,
            Error::DuplicateInput(_) => ErrorKind::DuplicateInput,
            Error::UnknownInput(_) => ErrorKind::UnknownInput,
            Error::AssetMismatch { .. } => ErrorKind::AssetMismatch,
            Error::WrongInputType(_) => ErrorKind::WrongInputType,
            Error::SignatureThreshold { .. } => ErrorKind::SignatureThresholdFailure,
            Error::ValueMismatch { .. } | Error::AmountOverflow => ErrorKind::ValueMismatch,
            Error::Locker(_) | Error::GhostChecker(_) => ErrorKind::Collaborator,
        }
    }

    /// Whether the same transaction may pass later without being changed
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Collaborator
    }
}
