pub mod extract;
pub mod inspect;

use std::path::PathBuf;

use clap::Parser;

use crate::settings::Settings;

/// Second positional value that selects the structure inspector.
pub const DEBUG_COMMAND: &str = "debug";

#[derive(Parser)]
#[command(
    name = "bluecoins-export",
    version,
    about = "Export every Bluecoins transaction to a flat CSV file."
)]
pub struct Cli {
    /// Path to the Bluecoins database (default: bluecoins.fydb)
    pub database: Option<String>,
    /// Output CSV path (default: all_transactions.csv), or `debug` to print
    /// table row counts and a raw transaction sample instead
    pub target: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Export { database: PathBuf, output: PathBuf },
    Inspect { database: PathBuf },
}

impl Cli {
    /// Positional arguments win over the settings file.
    pub fn command(&self, settings: &Settings) -> Command {
        let database = PathBuf::from(self.database.as_deref().unwrap_or(&settings.source_path));
        match self.target.as_deref() {
            Some(DEBUG_COMMAND) => Command::Inspect { database },
            Some(output) => Command::Export {
                database,
                output: PathBuf::from(output),
            },
            None => Command::Export {
                database,
                output: PathBuf::from(&settings.output_path),
            },
        }
    }
}
