use crypto::{Hash256, Key};

use crate::UTXO;

/// Gets a hash of an implementor (the `CNFastHash` of the implementor's canonical encoding)
pub trait GetHash {
    /// Gets a raw byte-wise representation of the implementor ready for hashing
    fn get_hash_blob(&self) -> Vec<u8>;

    /// Gets the hash of the implementor
    ///
    /// This hash serves as the ID of the implementor and can thus be adapted for different ID
    /// constructions
    fn get_hash(&self) -> Hash256 {
        Hash256::digest(&self.get_hash_blob())
    }
}

/// Trait for specifying that the implementor requires input data to satisfy certain conditions
///
/// Users can use this trait to do certain checks before more expensive checks
pub trait PreliminaryChecks<T> {
    /// Error returned by check
    type Error;

    /// Checks a given input according to the implementor's prerequisites
    ///
    /// # Returns
    /// An empty tuple if the input passes the prerequisites
    ///
    /// # Errors
    /// If the input doesn't satisfy the implementor's prerequisites
    fn check(&self, value: &T) -> Result<(), Self::Error>;
}

/// Atomic access to the UTXO set, used as the double spend guard
///
/// Implementations must check and lock in one atomic step: a UTXO that is unspent and
/// either unlocked, expired, or already locked by `claim` is (re)locked for `claim` until
/// `lock_until` (nanoseconds since the epoch) and returned. A UTXO held by another claimant
/// must produce an error; a spent or unknown one produces `Ok(None)`.
///
/// A call with the null hash as `claim` and a `lock_until` of zero is a read-only probe
/// and must not take or disturb any lock.
pub trait UTXOLocker {
    /// Error returned on lock contention or backend failure
    type Error: std::error::Error + Send + Sync + 'static;

    /// Locks output `index` of transaction `hash` for `claim` until `lock_until`
    fn lock_utxo(
        &self,
        hash: &Hash256,
        index: u64,
        claim: &Hash256,
        lock_until: u64,
    ) -> Result<Option<UTXO>, Self::Error>;
}

impl<F, E> UTXOLocker for F
where
    F: Fn(&Hash256, u64, &Hash256, u64) -> Result<Option<UTXO>, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn lock_utxo(
        &self,
        hash: &Hash256,
        index: u64,
        claim: &Hash256,
        lock_until: u64,
    ) -> Result<Option<UTXO>, E> {
        self(hash, index, claim, lock_until)
    }
}

/// Index of every one-time key that has appeared in a confirmed output
///
/// The view must only ever grow
pub trait GhostChecker {
    /// Error returned on backend failure
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether `key` has appeared in any confirmed output
    fn ghost_key_exists(&self, key: &Key) -> Result<bool, Self::Error>;
}

impl<F, E> GhostChecker for F
where
    F: Fn(&Key) -> Result<bool, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn ghost_key_exists(&self, key: &Key) -> Result<bool, E> {
        self(key)
    }
}
