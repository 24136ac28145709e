use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, trace};

use common::{GetHash, GhostChecker, Input, SignedTransaction, UTXOLocker, UTXOWithLock, UTXO};
use crypto::{Hash256, Key};

use crate::error::{Error, Result};

fn system_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// In-memory UTXO set and ghost key index
///
/// Locking is a check-then-lock under a single mutex, so concurrent validations of
/// conflicting transactions cannot both hold the same output
pub struct UTXOMemDB {
    utxos: Mutex<HashMap<Input, UTXOWithLock>>,
    ghost_keys: RwLock<HashSet<Key>>,
    clock: Box<dyn Fn() -> u64 + Send + Sync>,
}

impl Default for UTXOMemDB {
    fn default() -> Self {
        UTXOMemDB::new()
    }
}

impl UTXOMemDB {
    /// Creates an empty store that expires locks by the system clock
    pub fn new() -> UTXOMemDB {
        UTXOMemDB::with_clock(system_clock)
    }

    /// Creates an empty store reading the time (nanoseconds since the epoch) from `clock`
    pub fn with_clock<C>(clock: C) -> UTXOMemDB
    where
        C: Fn() -> u64 + Send + Sync + 'static,
    {
        UTXOMemDB {
            utxos: Mutex::new(HashMap::new()),
            ghost_keys: RwLock::new(HashSet::new()),
            clock: Box::new(clock),
        }
    }

    fn utxos(&self) -> Result<MutexGuard<'_, HashMap<Input, UTXOWithLock>>> {
        self.utxos.lock().map_err(|_| Error::Poisoned)
    }

    fn record_keys<'k>(&self, keys: impl Iterator<Item = &'k Key>) -> Result<()> {
        let mut ghost_keys = self.ghost_keys.write().map_err(|_| Error::Poisoned)?;
        ghost_keys.extend(keys);
        Ok(())
    }

    /// Adds an unspent output, such as a genesis or deposit output, and records its keys
    pub fn add_utxo(&self, utxo: UTXO) -> Result<()> {
        let input = utxo.input;
        {
            let mut utxos = self.utxos()?;
            if utxos.contains_key(&input) {
                return Err(Error::Exists(input));
            }
            self.record_keys(utxo.output.keys.iter())?;
            utxos.insert(input, UTXOWithLock::new(utxo));
        }

        debug!("Added UTXO {}", input);
        Ok(())
    }

    /// Confirms a transaction: spends its inputs and adds its script outputs
    ///
    /// Inputs must be unspent and not locked by another transaction. Nothing changes if any
    /// check fails.
    ///
    /// # Returns
    /// The UTXOs created by the transaction
    pub fn finalize_transaction(&self, tx: &SignedTransaction) -> Result<Vec<UTXO>> {
        let hash = tx.get_hash();
        let now = (self.clock)();
        let created = tx.transaction.unspent_outputs();

        let mut utxos = self.utxos()?;
        for input in &tx.transaction.inputs {
            let entry = utxos.get(input).ok_or(Error::DoesNotExist(*input))?;
            if entry.is_locked_by_other(&hash, now) {
                return Err(Error::Locked {
                    input: *input,
                    lock_hash: entry.lock_hash,
                });
            }
        }
        if let Some(utxo) = created.iter().find(|utxo| utxos.contains_key(&utxo.input)) {
            return Err(Error::Exists(utxo.input));
        }

        for input in &tx.transaction.inputs {
            utxos.remove(input);
        }
        self.record_keys(tx.transaction.outputs.iter().flat_map(|output| &output.keys))?;
        for utxo in &created {
            utxos.insert(utxo.input, UTXOWithLock::new(utxo.clone()));
        }

        debug!(
            "Finalized transaction {} spending {} and creating {} UTXOs",
            hash,
            tx.transaction.inputs.len(),
            created.len()
        );
        Ok(created)
    }

    /// Gets an unspent output along with its lock state
    pub fn utxo(&self, input: &Input) -> Result<Option<UTXOWithLock>> {
        Ok(self.utxos()?.get(input).cloned())
    }

    /// Number of unspent outputs
    pub fn len(&self) -> usize {
        self.utxos.lock().map(|utxos| utxos.len()).unwrap_or_default()
    }

    /// Whether the store holds no unspent outputs
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UTXOLocker for UTXOMemDB {
    type Error = Error;

    fn lock_utxo(
        &self,
        hash: &Hash256,
        index: u64,
        claim: &Hash256,
        lock_until: u64,
    ) -> Result<Option<UTXO>> {
        let input = Input { hash: *hash, index };
        let mut utxos = self.utxos()?;

        let entry = match utxos.get_mut(&input) {
            Some(entry) => entry,
            None => {
                trace!("UTXO {} not found", input);
                return Ok(None);
            }
        };

        if claim.is_null() && lock_until == 0 {
            trace!("Probed UTXO {}", input);
            return Ok(Some(entry.utxo.clone()));
        }

        if entry.is_locked_by_other(claim, (self.clock)()) {
            debug!("UTXO {} is locked by {}", input, entry.lock_hash);
            return Err(Error::Locked {
                input,
                lock_hash: entry.lock_hash,
            });
        }

        entry.lock_hash = *claim;
        entry.lock_until = lock_until;
        trace!("Locked UTXO {} for {} until {}", input, claim, lock_until);

        Ok(Some(entry.utxo.clone()))
    }
}

impl GhostChecker for UTXOMemDB {
    type Error = Error;

    fn ghost_key_exists(&self, key: &Key) -> Result<bool> {
        let ghost_keys = self.ghost_keys.read().map_err(|_| Error::Poisoned)?;
        Ok(ghost_keys.contains(key))
    }
}
