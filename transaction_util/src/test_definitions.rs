use std::convert::Infallible;

use rand::{rngs::StdRng, SeedableRng};

use common::{config::native_asset_id, Integer, Script, Transaction, UTXO};
use crypto::Hash256;

use crate::{tx_construction::add_script_output_with_rng, Address, PublicAddress};

/// Accounts plus a genesis transaction whose output `i` pays `accounts[0..=i]` under an
/// `i + 1` threshold
pub struct Fixture {
    pub accounts: Vec<Address>,
    pub genesis: Hash256,
    pub utxos: Vec<UTXO>,
}

impl Fixture {
    pub fn new(count: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(count as u64);
        let accounts = (0..count)
            .map(|_| Address::generate_with(&mut rng).unwrap())
            .collect::<Vec<_>>();

        let mut genesis = Transaction::new(native_asset_id());
        for i in 0..count {
            let owners = accounts[..=i]
                .iter()
                .map(Address::public_address)
                .collect::<Vec<_>>();
            add_script_output_with_rng(
                &mut rng,
                &mut genesis,
                &owners,
                Script::new_threshold(i as u8 + 1),
                Integer::new(10000),
            )
            .unwrap();
        }

        Fixture {
            accounts,
            genesis: common::GetHash::get_hash(&genesis),
            utxos: genesis.unspent_outputs(),
        }
    }

    pub fn public_addresses(&self) -> Vec<PublicAddress> {
        self.accounts.iter().map(Address::public_address).collect()
    }

    pub fn genesis_utxo(&self, index: usize) -> UTXO {
        self.utxos[index].clone()
    }
}

/// A locker serving the fixture's genesis outputs without ever locking them
pub fn genesis_locker(
    fixture: &Fixture,
) -> impl Fn(&Hash256, u64, &Hash256, u64) -> Result<Option<UTXO>, Infallible> + '_ {
    move |hash, index, _, _| {
        if *hash != fixture.genesis {
            return Ok(None);
        }
        Ok(fixture.utxos.get(index as usize).cloned())
    }
}
