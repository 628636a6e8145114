//! Command-line interface.
//!
//! Argument parsing uses clap's derive macros; [`run`] loads the application
//! options and dispatches to the requested command.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CreateArgs};

use crate::error::Result;
use crate::options::AppOptions;

/// Load options and execute the requested subcommand.
pub fn run(cli: &Cli) -> Result<()> {
    let options = AppOptions::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Create(args) => commands::create::execute(&options, args),
        Commands::List => commands::list::execute(&options),
    }
}
