//! Transaction validation pipeline
//!
//! Checks run in a fixed order and stop at the first violation:
//!
//! 1. version
//! 2. one signature list per input
//! 3. extra size
//! 4. signed transaction size
//! 5. output keys unique, both within the transaction and against every known output
//! 6. output sum
//! 7. per input: unique, locked for this transaction, same asset, script type, signatures
//!    meeting the script threshold
//! 8. input sum equals output sum
//!
//! Locks taken before a failure are kept until they expire.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

use common::{
    config::{EXTRA_SIZE_LIMIT, TX_VERSION},
    GetHash, GhostChecker, Input, InputType, Integer, PreliminaryChecks, SignedTransaction,
    UTXOLocker, UTXO,
};
use crypto::{Hash256, Key, Signature};
use ensure_macro::ensure;

use crate::{Config, Error, Result};

/// Nanoseconds since the unix epoch
pub(crate) fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Counts the signatures matching the keys in order
///
/// Each signature is matched against the keys from just past the previously matched key
/// onward and consumes the first key it verifies against. Signatures that match nothing are
/// skipped without failing, so a signature list given out of key order undercounts.
pub fn count_valid_signatures(message: &Hash256, keys: &[Key], signatures: &[Signature]) -> usize {
    let mut offset = 0;
    let mut valid = 0;

    for signature in signatures {
        let matched = keys
            .iter()
            .enumerate()
            .skip(offset)
            .find(|(_, key)| key.verify(message, signature));

        if let Some((i, _)) = matched {
            valid += 1;
            offset = i + 1;
        }
    }

    valid
}

/// Validates transactions against a UTXO locker and a ghost key index
pub struct TransactionValidator<'a, L, G> {
    locker: &'a L,
    ghost_checker: &'a G,
    config: Config,
}

impl<'a, L, G> TransactionValidator<'a, L, G>
where
    L: UTXOLocker,
    G: GhostChecker,
{
    /// Creates a validator with the given collaborators and parameters
    pub fn new(locker: &'a L, ghost_checker: &'a G, config: Config) -> Self {
        TransactionValidator {
            locker,
            ghost_checker,
            config,
        }
    }

    /// Validates the transaction at the current time
    ///
    /// On success every input is locked for this transaction for three snapshot rounds
    pub fn validate(&self, tx: &SignedTransaction) -> Result<()> {
        self.validate_at(tx, now_nanos())
    }

    /// Validates the transaction as of `now` (nanoseconds since the epoch)
    pub fn validate_at(&self, tx: &SignedTransaction, now: u64) -> Result<()> {
        self.check(tx)?;

        let mut output_keys = HashSet::new();
        let mut output_amount = Integer::zero();
        for output in &tx.transaction.outputs {
            for key in &output.keys {
                ensure!(output_keys.insert(*key), Error::DuplicateKey(*key));

                let exists = self
                    .ghost_checker
                    .ghost_key_exists(key)
                    .map_err(|e| Error::GhostChecker(Box::new(e)))?;
                ensure!(!exists, Error::DuplicateKey(*key));
            }

            output_amount = output_amount
                .checked_add(output.amount)
                .ok_or(Error::AmountOverflow)?;
        }
        debug!(
            "Transaction outputs {} keys summing to {}",
            output_keys.len(),
            output_amount
        );

        let hash = tx.get_hash();
        let lock_until = now.saturating_add(self.config.lock_duration());

        let mut inputs = HashSet::new();
        let mut input_amount = Integer::zero();
        for (input, signatures) in tx.transaction.inputs.iter().zip(&tx.signatures) {
            ensure!(inputs.insert(*input), Error::DuplicateInput(*input));

            let utxo = self
                .locker
                .lock_utxo(&input.hash, input.index, &hash, lock_until)
                .map_err(|e| Error::Locker(Box::new(e)))?
                .ok_or(Error::UnknownInput(*input))?;
            ensure!(
                utxo.asset == tx.transaction.asset,
                Error::AssetMismatch {
                    expected: tx.transaction.asset,
                    found: utxo.asset,
                }
            );

            validate_utxo(&hash, input, &utxo, signatures)?;

            input_amount = input_amount
                .checked_add(utxo.output.amount)
                .ok_or(Error::AmountOverflow)?;
        }

        ensure!(
            input_amount == output_amount,
            Error::ValueMismatch {
                inputs: input_amount,
                outputs: output_amount,
            }
        );

        debug!("Transaction {} is valid", hash);
        Ok(())
    }
}

fn validate_utxo(
    message: &Hash256,
    input: &Input,
    utxo: &UTXO,
    signatures: &[Signature],
) -> Result<()> {
    ensure!(
        utxo.utxo_type == InputType::Script,
        Error::WrongInputType(*input)
    );

    let valid = count_valid_signatures(message, &utxo.output.keys, signatures);
    debug!(
        "Input {} has {} valid signatures of {}",
        input,
        valid,
        signatures.len()
    );

    utxo.output
        .script
        .validate(valid)
        .map_err(|source| Error::SignatureThreshold {
            input: *input,
            source,
        })
}

/// Structural checks, run before any collaborator is consulted
impl<'a, L, G> PreliminaryChecks<SignedTransaction> for TransactionValidator<'a, L, G> {
    type Error = Error;

    fn check(&self, tx: &SignedTransaction) -> Result<()> {
        let transaction = &tx.transaction;

        ensure!(
            transaction.version == TX_VERSION,
            Error::InvalidVersion(transaction.version)
        );
        ensure!(
            transaction.inputs.len() == tx.signatures.len(),
            Error::SignatureCount {
                signatures: tx.signatures.len(),
                inputs: transaction.inputs.len(),
            }
        );
        ensure!(
            transaction.extra.len() <= EXTRA_SIZE_LIMIT,
            Error::ExtraTooLarge(transaction.extra.len())
        );

        let size = tx.marshal().len();
        ensure!(
            size <= self.config.transaction_maximum_size,
            Error::TransactionTooLarge(size)
        );

        Ok(())
    }
}

/// Validates the transaction with the default parameters
pub fn validate<L: UTXOLocker, G: GhostChecker>(
    tx: &SignedTransaction,
    locker: &L,
    ghost_checker: &G,
) -> Result<()> {
    TransactionValidator::new(locker, ghost_checker, Config::default()).validate(tx)
}
