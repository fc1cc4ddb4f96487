use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};

pub mod shell;

/// Client for an end-to-end encrypted daily journal
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(long, global = true, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Unlock the key, authenticate and open today's entry (default)
    Open,

    /// Generate a new passphrase-protected key pair
    Keygen {
        /// Where to write the sealed private key; the public key goes next to it with a `.pub` suffix
        #[clap(short = 'o', long)]
        out: Option<PathBuf>,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }

    /// The subcommand to run, `open` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Open)
    }
}
