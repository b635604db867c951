//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tagbridge - read and write audio file tags
///
/// Exposes the generic multi-valued property map, technical stream
/// properties, and a GEOB binary side channel for containers that support
/// named binary frames. Payloads and results are JSON.
#[derive(Parser, Debug)]
#[command(name = "tagbridge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read the property map as a JSON object of string arrays
    Read {
        /// Audio file to read
        path: PathBuf,
    },

    /// Merge properties into the file
    Write {
        /// Audio file to modify
        path: PathBuf,
        /// JSON object of string arrays; a string is accepted as a
        /// one-element array, an empty array deletes the key
        #[arg(long, value_name = "JSON")]
        tags: String,
    },

    /// Read technical stream properties (bitrate, channels, length, sample rate)
    Props {
        /// Audio file to read
        path: PathBuf,
    },

    /// Read the GEOB binary channel as a JSON object of base64 strings
    GeobRead {
        /// Audio file to read
        path: PathBuf,
    },

    /// Write GEOB binary channel entries
    GeobWrite {
        /// Audio file to modify
        path: PathBuf,
        /// JSON object mapping descriptions to base64 records; an empty
        /// string deletes the matching frame
        #[arg(long, value_name = "JSON")]
        entries: String,
    },
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
