//! Module for constructing transaction outputs

use log::debug;
use rand::{rngs::OsRng, CryptoRng, RngCore};

use common::{Integer, Output, OutputType, Script, Transaction};
use crypto::{Key, KeyPair};

use crate::{derivation::derive_ghost_public_key, PublicAddress};

/// Error type for transaction construction
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when the random source fails to produce the ephemeral key
    #[error("Could not generate ephemeral key")]
    Randomness(#[from] rand::Error),

    /// Returned when a one-time key could not be derived for a recipient
    #[error("Key derivation failed for recipient {0}")]
    KeyDerivation(usize),
}

type Result<T> = std::result::Result<T, Error>;

/// Appends a script output paying `amount` to `recipients` under `script`
///
/// A single ephemeral keypair `(r, R)` is drawn per output. Every recipient gets its own
/// one-time key `H_s(rV)G + S` in `keys`, in the same order as `recipients`, and `R` is
/// published as the output mask. An empty recipient list produces an output with no keys,
/// which nobody can spend unless its script requires no signatures.
pub fn add_script_output(
    tx: &mut Transaction,
    recipients: &[PublicAddress],
    script: Script,
    amount: Integer,
) -> Result<()> {
    add_script_output_with_rng(&mut OsRng, tx, recipients, script, amount)
}

/// Same as `add_script_output`, drawing the ephemeral key from the given CSPRNG
pub fn add_script_output_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    tx: &mut Transaction,
    recipients: &[PublicAddress],
    script: Script,
    amount: Integer,
) -> Result<()> {
    let ephemeral = KeyPair::generate_with(rng)?;

    let keys = recipients
        .iter()
        .enumerate()
        .map(|(i, recipient)| {
            derive_ghost_public_key(
                &ephemeral.secret_key,
                &recipient.view_public_key,
                &recipient.spend_public_key,
            )
            .map(|key| Key::from(&key))
            .ok_or(Error::KeyDerivation(i))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Adding script output {} of {} to {} recipients",
        tx.outputs.len(),
        amount,
        keys.len()
    );

    tx.outputs.push(Output {
        output_type: OutputType::Script,
        amount,
        script,
        keys,
        mask: Some(ephemeral.key()),
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use common::config::native_asset_id;

    use super::*;
    use crate::{view_ghost_output_key, Address};

    #[test]
    fn output_keys_follow_recipient_order() {
        let mut rng = StdRng::seed_from_u64(21);
        let accounts = (0..3)
            .map(|_| Address::generate_with(&mut rng).unwrap())
            .collect::<Vec<_>>();
        let recipients = accounts
            .iter()
            .map(Address::public_address)
            .collect::<Vec<_>>();

        let mut tx = Transaction::new(native_asset_id());
        add_script_output_with_rng(
            &mut rng,
            &mut tx,
            &recipients,
            Script::new_threshold(2),
            Integer::new(20000),
        )
        .unwrap();

        let output = &tx.outputs[0];
        assert_eq!(output.output_type, OutputType::Script);
        assert_eq!(output.script.to_string(), "fffe02");
        assert_eq!(output.keys.len(), 3);

        let mask = output.mask.unwrap().decompress().unwrap();
        for (key, account) in output.keys.iter().zip(&accounts) {
            let viewed = view_ghost_output_key(
                &key.decompress().unwrap(),
                &mask,
                &account.view_keypair.secret_key,
            )
            .unwrap();
            assert_eq!(viewed, account.spend_keypair.public_key);
        }
    }

    #[test]
    fn same_recipient_gets_distinct_keys_per_output() {
        let recipient = Address::generate().unwrap().public_address();
        let mut tx = Transaction::new(native_asset_id());

        for _ in 0..2 {
            add_script_output(
                &mut tx,
                &[recipient.clone()],
                Script::new_threshold(1),
                Integer::new(1),
            )
            .unwrap();
        }

        assert_ne!(tx.outputs[0].keys[0], tx.outputs[1].keys[0]);
        assert_ne!(tx.outputs[0].mask, tx.outputs[1].mask);
    }

    #[test]
    fn empty_recipient_list() {
        let mut tx = Transaction::new(native_asset_id());
        add_script_output(&mut tx, &[], Script::new_threshold(0), Integer::new(1)).unwrap();

        assert!(tx.outputs[0].keys.is_empty());
        assert!(tx.outputs[0].mask.is_some());
    }
}
