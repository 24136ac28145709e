use structopt::StructOpt;

use bin_common::Config as BinCommonConfig;
use blockchain::Config as BlockchainConfig;
use common::Integer;

#[derive(StructOpt, Debug)]
#[structopt(rename_all = "kebab-case", name = "ghost-cli")]
pub struct Config {
    #[structopt(flatten)]
    pub bin_common_config: BinCommonConfig,

    #[structopt(flatten)]
    pub blockchain_config: BlockchainConfig,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(StructOpt, Debug)]
#[structopt(rename_all = "kebab-case")]
pub enum Command {
    /// Generates an account and prints its keys
    Keygen {
        /// Hex encoded 64 byte seed to derive the account from
        #[structopt(long)]
        seed: Option<String>,
    },

    /// Pays a set of genesis outputs into a threshold output, then validates, confirms and
    /// scans it
    Demo {
        /// Number of accounts sharing the output
        #[structopt(long, default_value = "3")]
        accounts: usize,

        /// Number of signatures needed to spend the output
        #[structopt(long, default_value = "2")]
        threshold: u8,

        /// Amount of each genesis output
        #[structopt(long, default_value = "10000")]
        amount: Integer,
    },
}
