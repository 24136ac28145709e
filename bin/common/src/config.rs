use std::path::PathBuf;
use structopt::StructOpt;

/// Configuration for common systems
#[derive(StructOpt, Debug)]
#[structopt(rename_all = "kebab-case")]
pub struct Config {
    /// Sets the log level for the logger
    /// The levels correspond to the following:
    ///
    ///   0 - Warn
    ///   1 - Info
    ///   2 - Debug
    ///   3 - Trace
    #[structopt(long, default_value = "1")]
    pub log_level: u8,

    /// Sets the data directory to be used
    /// If unset, the default data directory is used
    #[structopt(long)]
    pub data_directory: Option<PathBuf>,
}

impl Config {
    /// The `log` filter for the configured level. Levels above 3 are treated as 3
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.log_level {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// The configured data directory, or the platform's data directory for the project
    pub fn data_directory(&self) -> Option<PathBuf> {
        match &self.data_directory {
            Some(custom_data_directory) => Some(custom_data_directory.to_path_buf()),
            None => directories::ProjectDirs::from("one", "Ghost Project", "Ghost")
                .map(|dirs| dirs.data_dir().to_path_buf()),
        }
    }
}
