use serde::{Deserialize, Serialize};

use crypto::Hash256;

use crate::{GetHash, Input, InputType, Output, SignedTransaction, Transaction};

/// An unspent transaction output
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UTXO {
    /// Reference to the output
    pub input: Input,
    /// How the output came into existence. Only `InputType::Script` is spendable by signature
    #[serde(rename = "type")]
    pub utxo_type: InputType,
    /// The output itself
    pub output: Output,
    /// Asset of the transaction that created the output
    pub asset: Hash256,
}

/// A UTXO along with the pending transaction currently holding it
///
/// A lock is a reservation, not a spend: it lapses once `lock_until` passes
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UTXOWithLock {
    pub utxo: UTXO,
    /// Hash of the holding transaction, the null hash when unlocked
    pub lock_hash: Hash256,
    /// Expiry of the lock in nanoseconds since the epoch
    pub lock_until: u64,
}

impl UTXOWithLock {
    /// An unlocked UTXO
    pub fn new(utxo: UTXO) -> Self {
        UTXOWithLock {
            utxo,
            lock_hash: Hash256::null_hash(),
            lock_until: 0,
        }
    }

    /// Whether a transaction other than `claim` holds an unexpired lock at time `now`
    pub fn is_locked_by_other(&self, claim: &Hash256, now: u64) -> bool {
        !self.lock_hash.is_null() && &self.lock_hash != claim && self.lock_until > now
    }
}

impl Transaction {
    /// The spendable outputs created by this transaction
    ///
    /// Every script output at position `i` becomes a UTXO keyed `(hash, i)`. Other output
    /// types move value out of the spend path and produce nothing
    pub fn unspent_outputs(&self) -> Vec<UTXO> {
        let hash = self.get_hash();

        self.outputs
            .iter()
            .enumerate()
            .filter(|(_, output)| output.is_script())
            .map(|(index, output)| UTXO {
                input: Input {
                    hash,
                    index: index as u64,
                },
                utxo_type: InputType::Script,
                output: output.clone(),
                asset: self.asset,
            })
            .collect()
    }
}

/// A finalized transaction container
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// The finalized transaction, absent for an empty container
    pub transaction: Option<SignedTransaction>,
}

impl Snapshot {
    /// The UTXOs implied by the finalized transaction, if any
    pub fn unspent_outputs(&self) -> Vec<UTXO> {
        self.transaction
            .as_ref()
            .map(|signed| signed.transaction.unspent_outputs())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crypto::{Key, KeyPair};

    use super::*;
    use crate::{config::native_asset_id, Integer, OutputType, Script};

    fn script_output(amount: u64, keys: usize) -> Output {
        Output {
            output_type: OutputType::Script,
            amount: Integer::new(amount),
            script: Script::new_threshold(2),
            keys: (0..keys).map(|_| KeyPair::generate().unwrap().key()).collect(),
            mask: Some(KeyPair::generate().unwrap().key()),
        }
    }

    #[test]
    fn empty_snapshot_has_no_outputs() {
        assert!(Snapshot::default().unspent_outputs().is_empty());
    }

    #[test]
    fn projects_script_outputs() {
        let mut tx = Transaction::new(native_asset_id());
        tx.add_input(Hash256::null_hash(), 0);
        tx.add_input(Hash256::null_hash(), 1);
        tx.outputs.push(script_output(20000, 3));

        let snapshot = Snapshot {
            transaction: Some(SignedTransaction::from(tx.clone())),
        };
        let utxos = snapshot.unspent_outputs();
        assert_eq!(utxos.len(), 1);

        let utxo = &utxos[0];
        assert_eq!(utxo.input.hash, tx.get_hash());
        assert_eq!(utxo.input.index, 0);
        assert_eq!(utxo.utxo_type, InputType::Script);
        assert_eq!(utxo.output.output_type, OutputType::Script);
        assert_eq!(utxo.output.amount.to_string(), "20000.00000000");
        assert_eq!(utxo.output.script.to_string(), "fffe02");
        assert_eq!(utxo.output.keys.len(), 3);
        assert_eq!(utxo.asset, native_asset_id());
    }

    #[test]
    fn skips_protocol_outputs_but_keeps_positions() {
        let mut tx = Transaction::new(native_asset_id());
        tx.outputs.push(Output {
            output_type: OutputType::Pledge,
            amount: Integer::new(1),
            script: Script::default(),
            keys: Vec::new(),
            mask: None,
        });
        tx.outputs.push(script_output(2, 1));

        let utxos = tx.unspent_outputs();
        assert_eq!(utxos.len(), 1);
        assert_eq!(utxos[0].input.index, 1);
        assert_eq!(utxos[0].output.amount, Integer::new(2));
    }

    #[test]
    fn lock_expiry() {
        let utxo = tx_utxo();
        let claim = Hash256::digest(b"claim");
        let other = Hash256::digest(b"other");

        let mut locked = UTXOWithLock::new(utxo);
        assert!(!locked.is_locked_by_other(&other, 10));

        locked.lock_hash = claim;
        locked.lock_until = 100;
        assert!(locked.is_locked_by_other(&other, 10));
        assert!(!locked.is_locked_by_other(&claim, 10));
        assert!(!locked.is_locked_by_other(&other, 100));
    }

    fn tx_utxo() -> UTXO {
        UTXO {
            input: Input {
                hash: Hash256::null_hash(),
                index: 0,
            },
            utxo_type: InputType::Script,
            output: Output {
                output_type: OutputType::Script,
                amount: Integer::new(1),
                script: Script::new_threshold(1),
                keys: vec![Key::default()],
                mask: None,
            },
            asset: native_asset_id(),
        }
    }
}
