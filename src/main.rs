//! tagbridge CLI entry point

use clap::Parser;
use std::process::ExitCode;
use tagbridge::config::{payload, Cli, Command};
use tagbridge::{bridge, Result};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Read { path } => {
            let store = bridge::read_tags(path)?;
            print_json(&store);
        }
        Command::Write { path, tags } => {
            let incoming = payload::parse_property_payload(&tags)?;
            let saved = bridge::write_tags(path, incoming)?;
            print_json(&serde_json::json!({ "saved": saved }));
        }
        Command::Props { path } => {
            let props = bridge::read_audio_properties(path)?;
            print_json(&props);
        }
        Command::GeobRead { path } => {
            let channel = bridge::read_binary_channel(path)?;
            print_json(&channel);
        }
        Command::GeobWrite { path, entries } => {
            let entries = payload::parse_channel_payload(&entries)?;
            let saved = bridge::write_binary_channel(path, entries)?;
            print_json(&serde_json::json!({ "saved": saved }));
        }
    }

    Ok(())
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: could not serialize result: {}", e),
    }
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string())),
        )
        .with_target(false)
        .init();
}
