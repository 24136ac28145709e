//! Pool of validated, unconfirmed transactions

use std::collections::HashMap;

use log::{info, warn};

use common::{GetHash, GhostChecker, SignedTransaction, UTXOLocker};
use crypto::Hash256;
use ensure_macro::ensure;

use crate::validation::TransactionValidator;

type Result<T> = std::result::Result<T, Error>;

/// Error type for TXPool operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when the transaction is already pooled
    #[error("Transaction {0} exists in the pool")]
    Exists(Hash256),

    /// Returned when the transaction fails validation
    #[error(transparent)]
    Validation(#[from] crate::Error),
}

/// A memory pool of unconfirmed transactions
///
/// Transactions are validated on entry, which leaves their inputs locked for them
pub struct TXPool<'a, L, G> {
    validator: TransactionValidator<'a, L, G>,
    transactions: HashMap<Hash256, SignedTransaction>,
}

impl<'a, L, G> TXPool<'a, L, G>
where
    L: UTXOLocker,
    G: GhostChecker,
{
    /// Creates a new TXPool validating with the given validator
    pub fn new(validator: TransactionValidator<'a, L, G>) -> Self {
        TXPool {
            validator,
            transactions: HashMap::new(),
        }
    }

    /// Validates an unconfirmed transaction and adds it to the TXPool
    ///
    /// # Returns
    /// The transaction's hash
    pub fn add_transaction(&mut self, tx: SignedTransaction) -> Result<Hash256> {
        let hash = tx.get_hash();
        ensure!(!self.has_transaction(&hash), Error::Exists(hash));

        if let Err(e) = self.validator.validate(&tx) {
            warn!("Rejected transaction {}: {}", hash, e);
            return Err(e.into());
        }

        info!("Added transaction {} to the pool", hash);
        self.transactions.insert(hash, tx);
        Ok(hash)
    }

    /// Check if this TXPool contains the given transaction using the txid
    pub fn has_transaction(&self, txid: &Hash256) -> bool {
        self.transactions.contains_key(txid)
    }

    /// Takes the transaction, removing it from the TXPool in the process
    pub fn take_transaction(&mut self, txid: &Hash256) -> Option<SignedTransaction> {
        self.transactions.remove(txid)
    }

    /// Number of pooled transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use common::Integer;

    use super::*;
    use crate::test_definitions::{spend_genesis, Fixture};
    use crate::{Config, ErrorKind};

    #[test]
    fn pools_valid_transactions() {
        let fixture = Fixture::new(3);
        let mut pool = TXPool::new(TransactionValidator::new(
            &fixture.db,
            &fixture.db,
            Config::default(),
        ));

        let mut tx = spend_genesis(&fixture, Integer::new(20000));
        fixture.sign_all(&mut tx);

        let hash = pool.add_transaction(tx.clone()).unwrap();
        assert!(pool.has_transaction(&hash));
        assert_eq!(pool.len(), 1);

        assert!(matches!(
            pool.add_transaction(tx.clone()),
            Err(Error::Exists(existing)) if existing == hash
        ));

        assert_eq!(pool.take_transaction(&hash), Some(tx));
        assert!(pool.is_empty());
    }

    #[test]
    fn rejects_invalid_transactions() {
        let fixture = Fixture::new(3);
        let mut pool = TXPool::new(TransactionValidator::new(
            &fixture.db,
            &fixture.db,
            Config::default(),
        ));

        let tx = spend_genesis(&fixture, Integer::new(20000));
        match pool.add_transaction(tx) {
            Err(Error::Validation(e)) => assert_eq!(e.kind(), ErrorKind::Malformed),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(pool.is_empty());
    }
}
