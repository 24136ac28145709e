//! Module for scanning transactions

use common::{Output, Transaction};
use crypto::{Key, PublicKey, SecretKey};

use crate::{derivation::view_ghost_output_key, Address};

/// Stands in for keys that cannot be viewed: undecodable keys and the keys of outputs
/// without a usable mask
///
/// It is a small-order point, so it never equals a spend key
pub const UNVIEWABLE_KEY: Key = Key::from_bytes([0; 32]);

/// An output key recognized as belonging to an account
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OwnedOutput {
    /// Position of the output in the transaction
    pub output_index: usize,
    /// Position of the account's key among the output's keys
    pub key_index: usize,
}

fn view_key(key: &Key, mask: Option<&PublicKey>, view_secret_key: &SecretKey) -> Key {
    let viewed = match (key.decompress(), mask) {
        (Some(key), Some(mask)) => view_ghost_output_key(&key, mask, view_secret_key),
        _ => None,
    };

    viewed.map_or(UNVIEWABLE_KEY, |viewed| Key::from(&viewed))
}

/// Replaces every key of every script output with `K - H_s(aR)G`
///
/// For keys paying the viewer this recovers its public spend key, for the others it is
/// unrelated noise. Non-script outputs are dropped, so the result is one record per script
/// output in transaction order. Keys that are not curve points, and all keys of an output
/// whose mask is missing or not a curve point, become `UNVIEWABLE_KEY`. Deciding
/// membership is up to the caller.
pub fn view_ghost_keys(tx: &Transaction, view_secret_key: &SecretKey) -> Vec<Output> {
    tx.outputs
        .iter()
        .filter(|output| output.is_script())
        .map(|output| {
            let mask = output.mask.and_then(|mask| mask.decompress());
            let keys = output
                .keys
                .iter()
                .map(|key| view_key(key, mask.as_ref(), view_secret_key))
                .collect();

            Output {
                keys,
                ..output.clone()
            }
        })
        .collect()
}

/// Finds the output keys of `tx` paying `address`
pub fn scan_outputs(tx: &Transaction, address: &Address) -> Vec<OwnedOutput> {
    let spend_key = Key::from(&address.spend_keypair.public_key);
    let script_outputs = tx
        .outputs
        .iter()
        .enumerate()
        .filter(|(_, output)| output.is_script())
        .map(|(output_index, _)| output_index);

    script_outputs
        .zip(view_ghost_keys(tx, &address.view_keypair.secret_key))
        .flat_map(|(output_index, output)| {
            output
                .keys
                .into_iter()
                .enumerate()
                .filter(|(_, key)| *key == spend_key)
                .map(move |(key_index, _)| OwnedOutput {
                    output_index,
                    key_index,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use common::{config::native_asset_id, Integer, OutputType, Script};

    use super::*;
    use crate::{test_definitions::Fixture, tx_construction::add_script_output};

    fn three_way_transaction(fixture: &Fixture) -> Transaction {
        let mut tx = Transaction::new(native_asset_id());
        tx.add_input(fixture.genesis, 0);
        tx.add_input(fixture.genesis, 1);
        add_script_output(
            &mut tx,
            &fixture.public_addresses(),
            Script::new_threshold(2),
            Integer::new(20000),
        )
        .unwrap();
        tx
    }

    #[test]
    fn view_key_recovers_spend_key() {
        let fixture = Fixture::new(3);
        let tx = three_way_transaction(&fixture);
        let account = &fixture.accounts[1];

        let outputs = view_ghost_keys(&tx, &account.view_keypair.secret_key);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].keys.len(), 3);
        assert_eq!(outputs[0].amount, Integer::new(20000));
        assert_eq!(outputs[0].mask, tx.outputs[0].mask);
        assert_eq!(
            outputs[0].keys[1],
            Key::from(&account.spend_keypair.public_key)
        );
        assert_ne!(
            outputs[0].keys[0],
            Key::from(&account.spend_keypair.public_key)
        );
    }

    #[test]
    fn spend_key_is_not_a_view_key() {
        let fixture = Fixture::new(3);
        let tx = three_way_transaction(&fixture);
        let account = &fixture.accounts[1];

        let outputs = view_ghost_keys(&tx, &account.spend_keypair.secret_key);
        assert_ne!(
            outputs[0].keys[1],
            Key::from(&account.spend_keypair.public_key)
        );
        assert_ne!(
            outputs[0].keys[1],
            Key::from(&account.view_keypair.public_key)
        );
    }

    #[test]
    fn scans_owned_outputs() {
        let fixture = Fixture::new(3);
        let mut tx = three_way_transaction(&fixture);
        tx.outputs.insert(
            0,
            Output {
                output_type: OutputType::Withdrawal,
                amount: Integer::new(1),
                script: Script::default(),
                keys: Vec::new(),
                mask: None,
            },
        );

        assert_eq!(
            scan_outputs(&tx, &fixture.accounts[2]),
            vec![OwnedOutput {
                output_index: 1,
                key_index: 2
            }]
        );

        let stranger = Address::generate().unwrap();
        assert!(scan_outputs(&tx, &stranger).is_empty());
    }

    #[test]
    fn unviewable_outputs_do_not_hide_owned_ones() {
        let fixture = Fixture::new(3);
        let mut tx = three_way_transaction(&fixture);
        let mut garbage = tx.outputs[0].clone();
        garbage.amount = Integer::zero();
        // y = 2 is not on the curve
        let mut bytes = [0; 32];
        bytes[0] = 2;
        garbage.keys = vec![Key::from_bytes(bytes)];
        tx.outputs.push(garbage.clone());
        garbage.mask = None;
        garbage.keys = vec![tx.outputs[0].keys[0]];
        tx.outputs.push(garbage);

        let account = &fixture.accounts[0];
        let viewed = view_ghost_keys(&tx, &account.view_keypair.secret_key);
        assert_eq!(viewed.len(), 3);
        assert_eq!(viewed[1].keys, vec![UNVIEWABLE_KEY]);
        assert_eq!(viewed[2].keys, vec![UNVIEWABLE_KEY]);

        assert_eq!(
            scan_outputs(&tx, account),
            vec![OwnedOutput {
                output_index: 0,
                key_index: 0
            }]
        );
    }
}
