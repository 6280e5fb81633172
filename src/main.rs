// src/main.rs
use anyhow::Result;
use clap::Parser;
use colorful::Colorful;

use bellsplit::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    log::debug!("Debug mode enabled");
    cli::run(cli)
}

/// `--debug` forces Debug; otherwise `RUST_LOG` decides, defaulting to Info.
fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp_millis().init();
}
