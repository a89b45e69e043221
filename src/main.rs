mod cli;
mod db;
mod error;
mod exporter;
mod fmt;
mod models;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = settings::load_settings();

    let result = match cli.command(&settings) {
        Command::Export { database, output } => cli::extract::run(&database, &output).map(|_| ()),
        Command::Inspect { database } => {
            cli::inspect::run(&database);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::debug!(kind = ?e.kind(), "export failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
