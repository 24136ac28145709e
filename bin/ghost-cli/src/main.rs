use log::{error, info};
use structopt::StructOpt;

use blockchain::{TXPool, TransactionValidator};
use blockchain_db::UTXOMemDB;
use common::{config::native_asset_id, Integer, Script, SignedTransaction, Snapshot, Transaction};
use transaction_util::{tx_construction, tx_scanning, tx_signing, Address};

mod config;
use config::{Command, Config};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() {
    // Command Line Arguments
    let config = Config::from_args();

    // Logging
    bin_common::logger::init(&config.bin_common_config, "ghost-cli")
        .expect("Failed to initialise logger");

    // Main
    let result = match &config.command {
        Command::Keygen { seed } => keygen(seed.as_ref().map(String::as_str)),
        Command::Demo {
            accounts,
            threshold,
            amount,
        } => demo(&config, *accounts, *threshold, *amount),
    };
    result.unwrap_or_else(|err| error!("Unable to run command! {}", err));
}

fn keygen(seed: Option<&str>) -> Result<()> {
    let address = match seed {
        Some(seed) => {
            let bytes = hex::decode(seed)?;
            if bytes.len() != 64 {
                return Err(format!("Seed must be 64 bytes, got {}", bytes.len()).into());
            }
            let mut seed = [0; 64];
            seed.copy_from_slice(&bytes);
            Address::from_seed(&seed)
        }
        None => Address::generate()?,
    };

    println!(
        "spend secret key: {}",
        hex::encode(address.spend_keypair.secret_key.as_bytes())
    );
    println!(
        "view secret key:  {}",
        hex::encode(address.view_keypair.secret_key.as_bytes())
    );
    println!("address:          {}", address.public_address());
    Ok(())
}

fn demo(config: &Config, account_count: usize, threshold: u8, amount: Integer) -> Result<()> {
    if threshold == 0 || usize::from(threshold) > account_count {
        return Err(format!(
            "Threshold must be between 1 and {}, got {}",
            account_count, threshold
        )
        .into());
    }

    let accounts = (0..account_count)
        .map(|_| Address::generate())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let recipients = accounts
        .iter()
        .map(Address::public_address)
        .collect::<Vec<_>>();

    // Genesis: one single-owner output per account
    let mut genesis = Transaction::new(native_asset_id());
    for recipient in &recipients {
        tx_construction::add_script_output(
            &mut genesis,
            &[recipient.clone()],
            Script::new_threshold(1),
            amount,
        )?;
    }
    let genesis = Snapshot {
        transaction: Some(SignedTransaction::from(genesis)),
    };

    let db = UTXOMemDB::new();
    let mut total = Integer::zero();
    let mut tx = Transaction::new(native_asset_id());
    for utxo in genesis.unspent_outputs() {
        info!("Genesis UTXO {} of {}", utxo.input, utxo.output.amount);
        tx.add_input(utxo.input.hash, utxo.input.index);
        total = total
            .checked_add(utxo.output.amount)
            .ok_or("Genesis amount overflow")?;
        db.add_utxo(utxo)?;
    }

    tx_construction::add_script_output(
        &mut tx,
        &recipients,
        Script::new_threshold(threshold),
        total,
    )?;
    let mut tx = SignedTransaction::from(tx);
    for index in 0..tx.transaction.inputs.len() {
        tx_signing::sign_input(&mut tx, &db, index, &accounts)?;
    }

    let validator = TransactionValidator::new(&db, &db, config.blockchain_config.clone());
    let mut pool = TXPool::new(validator);
    let hash = pool.add_transaction(tx)?;
    info!("Transaction {} validated", hash);

    let tx = pool
        .take_transaction(&hash)
        .ok_or("Transaction missing from pool")?;
    for utxo in db.finalize_transaction(&tx)? {
        info!(
            "Created UTXO {} of {} under script {}",
            utxo.input, utxo.output.amount, utxo.output.script
        );
    }

    for (i, account) in accounts.iter().enumerate() {
        for owned in tx_scanning::scan_outputs(&tx.transaction, account) {
            info!(
                "Account {} owns key {} of output {}",
                i, owned.key_index, owned.output_index
            );
        }
    }

    println!("{}", hash);
    Ok(())
}
