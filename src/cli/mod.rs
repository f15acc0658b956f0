use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

mod browse;
mod server;

/// Command line options for Scribe.
#[derive(Debug, Parser)]
#[command(about = "A small blog with a paginated post listing", version, author, long_about)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(Debug, Error)]
#[error("Scribe exited with an error")]
pub struct RunError;

impl Cli {
    pub fn run(self) -> Result<(), RunError> {
        match self.subcommand {
            Subcommand::Server(args) => self::server::run(args).change_context(RunError),
            Subcommand::Browse(args) => self::browse::run(args).change_context(RunError),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Server(self::server::ServerCommand),
    Browse(self::browse::BrowseCommand),
}
