use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use blockchain_db::UTXOMemDB;
use common::{config::native_asset_id, GetHash, Integer, Script, SignedTransaction, Transaction};
use crypto::Hash256;
use transaction_util::{tx_construction, tx_signing, Address, PublicAddress};

/// Time the fixture's store starts at
pub const GENESIS_TIME: u64 = 1_000;

/// Accounts and a store holding a genesis transaction whose output `i` pays
/// `accounts[0..=i]` 10000 under an `i + 1` threshold
pub struct Fixture {
    pub accounts: Vec<Address>,
    pub db: UTXOMemDB,
    pub genesis: Hash256,
    clock: Arc<AtomicU64>,
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
            tx_construction::add_script_output_with_rng(
                &mut rng,
                &mut genesis,
                &owners,
                Script::new_threshold(i as u8 + 1),
                Integer::new(10000),
            )
            .unwrap();
        }

        let clock = Arc::new(AtomicU64::new(GENESIS_TIME));
        let db_clock = Arc::clone(&clock);
        let db = UTXOMemDB::with_clock(move || db_clock.load(Ordering::SeqCst));
        for utxo in genesis.unspent_outputs() {
            db.add_utxo(utxo).unwrap();
        }

        Fixture {
            accounts,
            db,
            genesis: genesis.get_hash(),
            clock,
        }
    }

    pub fn public_addresses(&self) -> Vec<PublicAddress> {
        self.accounts.iter().map(Address::public_address).collect()
    }

    pub fn now(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }

    pub fn set_now(&self, now: u64) {
        self.clock.store(now, Ordering::SeqCst);
    }

    /// Signs every input with every account
    pub fn sign_all(&self, tx: &mut SignedTransaction) {
        for index in 0..tx.transaction.inputs.len() {
            tx_signing::sign_input(tx, &self.db, index, &self.accounts).unwrap();
        }
    }
}

/// Unsigned transaction spending genesis outputs 0 and 1 into one 2-of-3 output
pub fn spend_genesis(fixture: &Fixture, amount: Integer) -> SignedTransaction {
    let mut tx = Transaction::new(native_asset_id());
    tx.add_input(fixture.genesis, 0);
    tx.add_input(fixture.genesis, 1);
    tx_construction::add_script_output(
        &mut tx,
        &fixture.public_addresses(),
        Script::new_threshold(2),
        amount,
    )
    .unwrap();
    SignedTransaction::from(tx)
}
