use structopt::StructOpt;

use common::config::{SNAPSHOT_ROUND_GAP, TRANSACTION_MAXIMUM_SIZE, UTXO_LOCK_ROUNDS};

/// Runtime parameters of transaction validation
#[derive(StructOpt, Clone, Debug)]
#[structopt(rename_all = "kebab-case", name = "Ghost")]
pub struct Config {
    /// Maximum canonical size of a signed transaction, in bytes
    #[structopt(long, default_value = "1048576")]
    pub transaction_maximum_size: usize,

    /// Time between snapshot rounds, in nanoseconds
    ///
    /// Inputs of a validated transaction stay locked for three rounds
    #[structopt(long, default_value = "3000000000")]
    pub snapshot_round_gap: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            transaction_maximum_size: TRANSACTION_MAXIMUM_SIZE,
            snapshot_round_gap: SNAPSHOT_ROUND_GAP,
        }
    }
}

impl Config {
    /// How long validation locks inputs for, in nanoseconds
    pub fn lock_duration(&self) -> u64 {
        self.snapshot_round_gap.saturating_mul(UTXO_LOCK_ROUNDS)
    }
}
