//! Module for signing transaction inputs

use log::{debug, trace};
use rand::{rngs::OsRng, CryptoRng, RngCore};

use common::{GetHash, Input, SignedTransaction, UTXOLocker};
use crypto::{Hash256, KeyPair, Signature};
use ensure_macro::ensure;

use crate::{derivation::derive_ghost_private_key, Address};

/// Error type for input signing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when the input index is beyond the transaction's inputs
    #[error("Invalid input index {index}/{count}")]
    InvalidInputIndex {
        /// Requested input index
        index: usize,
        /// Number of inputs in the transaction
        count: usize,
    },

    /// Returned when the locker does not know the referenced output
    #[error("Input not found {0}")]
    InputNotFound(Input),

    /// Returned when the referenced output carries no usable mask
    #[error("Invalid mask for input {0}")]
    InvalidMask(Input),

    /// Returned when the random source fails to produce a signature nonce
    #[error("Could not generate signature nonce")]
    Randomness(#[from] rand::Error),

    /// Returned when the locker fails
    #[error(transparent)]
    Locker(Box<dyn std::error::Error + Send + Sync>),
}

type Result<T> = std::result::Result<T, Error>;

/// Signs input `index` of `tx` with every account in `accounts` that owns one of the
/// referenced output's keys
///
/// The referenced output is read through `locker` without taking a lock. Accounts that
/// own none of the keys are skipped. The resulting list, ordered by key position, becomes
/// the input's signature entry: signing inputs in order appends one entry per input, and
/// signing an input again replaces its entry.
pub fn sign_input<L: UTXOLocker>(
    tx: &mut SignedTransaction,
    locker: &L,
    index: usize,
    accounts: &[Address],
) -> Result<()> {
    sign_input_with_rng(&mut OsRng, tx, locker, index, accounts)
}

/// Same as `sign_input`, drawing signature nonces from the given CSPRNG
pub fn sign_input_with_rng<R: RngCore + CryptoRng, L: UTXOLocker>(
    rng: &mut R,
    tx: &mut SignedTransaction,
    locker: &L,
    index: usize,
    accounts: &[Address],
) -> Result<()> {
    let count = tx.transaction.inputs.len();
    ensure!(index < count, Error::InvalidInputIndex { index, count });

    let input = tx.transaction.inputs[index];
    let utxo = locker
        .lock_utxo(&input.hash, input.index, &Hash256::null_hash(), 0)
        .map_err(|e| Error::Locker(Box::new(e)))?
        .ok_or(Error::InputNotFound(input))?;

    let mask = utxo
        .output
        .mask
        .and_then(|mask| mask.decompress())
        .ok_or(Error::InvalidMask(input))?;

    let message = tx.transaction.get_hash();
    let keys = &utxo.output.keys;

    let mut signatures = Vec::new();
    for account in accounts {
        let secret_key = match derive_ghost_private_key(
            &mask,
            &account.view_keypair.secret_key,
            &account.spend_keypair.secret_key,
        ) {
            Some(secret_key) => secret_key,
            None => continue,
        };
        let keypair = KeyPair::from(secret_key);

        match keys.iter().position(|key| *key == keypair.key()) {
            Some(position) => {
                let signature = Signature::sign_with(rng, &message, &keypair)?;
                signatures.push((position, signature));
            }
            None => trace!("Account does not own a key of input {}", input),
        }
    }

    // Validation matches signatures to keys in key order
    signatures.sort_by_key(|(position, _)| *position);
    signatures.dedup_by_key(|(position, _)| *position);

    debug!(
        "Signed input {} with {} of {} keys",
        input,
        signatures.len(),
        keys.len()
    );

    if tx.signatures.len() <= index {
        tx.signatures.resize_with(index + 1, Vec::new);
    }
    tx.signatures[index] = signatures.into_iter().map(|(_, signature)| signature).collect();

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use common::{config::native_asset_id, Integer, Script, Transaction};

    use super::*;
    use crate::test_definitions::{genesis_locker, Fixture};

    fn spend_genesis(fixture: &Fixture) -> SignedTransaction {
        let mut tx = Transaction::new(native_asset_id());
        tx.add_input(fixture.genesis, 0);
        tx.add_input(fixture.genesis, 1);
        crate::tx_construction::add_script_output(
            &mut tx,
            &fixture.public_addresses(),
            Script::new_threshold(2),
            Integer::new(20000),
        )
        .unwrap();
        SignedTransaction::from(tx)
    }

    #[test]
    fn signs_with_owning_accounts_only() {
        let fixture = Fixture::new(3);
        let locker = genesis_locker(&fixture);
        let mut tx = spend_genesis(&fixture);

        // Genesis output 0 is owned by accounts[0] alone
        sign_input(&mut tx, &locker, 0, &fixture.accounts).unwrap();
        // Genesis output 1 is owned by accounts[0] and accounts[1]
        sign_input(&mut tx, &locker, 1, &fixture.accounts).unwrap();

        assert_eq!(tx.signatures.len(), 2);
        assert_eq!(tx.signatures[0].len(), 1);
        assert_eq!(tx.signatures[1].len(), 2);

        let message = tx.transaction.get_hash();
        let utxo = fixture.genesis_utxo(1);
        for (signature, key) in tx.signatures[1].iter().zip(&utxo.output.keys) {
            assert!(key.verify(&message, signature));
        }
    }

    #[test]
    fn signature_order_follows_keys() {
        let fixture = Fixture::new(3);
        let locker = genesis_locker(&fixture);
        let mut tx = spend_genesis(&fixture);

        let reversed = fixture.accounts.iter().rev().cloned().collect::<Vec<_>>();
        sign_input(&mut tx, &locker, 0, &reversed).unwrap();
        sign_input(&mut tx, &locker, 1, &reversed).unwrap();

        let message = tx.transaction.get_hash();
        let keys = &fixture.genesis_utxo(1).output.keys;
        assert!(keys[0].verify(&message, &tx.signatures[1][0]));
        assert!(keys[1].verify(&message, &tx.signatures[1][1]));
    }

    #[test]
    fn signing_out_of_order_and_again() {
        let fixture = Fixture::new(3);
        let locker = genesis_locker(&fixture);
        let mut tx = spend_genesis(&fixture);
        let mut rng = StdRng::seed_from_u64(5);

        sign_input_with_rng(&mut rng, &mut tx, &locker, 1, &fixture.accounts[1..2]).unwrap();
        assert_eq!(tx.signatures.len(), 2);
        assert!(tx.signatures[0].is_empty());
        assert_eq!(tx.signatures[1].len(), 1);

        sign_input_with_rng(&mut rng, &mut tx, &locker, 1, &fixture.accounts).unwrap();
        assert_eq!(tx.signatures[1].len(), 2);
    }

    #[test]
    fn foreign_accounts_produce_empty_list() {
        let fixture = Fixture::new(3);
        let locker = genesis_locker(&fixture);
        let mut tx = spend_genesis(&fixture);

        let stranger = Address::generate().unwrap();
        sign_input(&mut tx, &locker, 0, &[stranger]).unwrap();
        assert_eq!(tx.signatures, vec![Vec::new()]);
    }

    #[test]
    fn rejects_bad_index_and_unknown_input() {
        let fixture = Fixture::new(3);
        let locker = genesis_locker(&fixture);
        let mut tx = spend_genesis(&fixture);

        match sign_input(&mut tx, &locker, 2, &fixture.accounts) {
            Err(Error::InvalidInputIndex { index: 2, count: 2 }) => {}
            other => panic!("unexpected result {:?}", other),
        }

        tx.transaction.add_input(Hash256::digest(b"unknown"), 0);
        match sign_input(&mut tx, &locker, 2, &fixture.accounts) {
            Err(Error::InputNotFound(input)) => assert_eq!(input.index, 0),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
