//! CLI argument definitions.
//!
//! All arguments are defined with clap's derive macros; [`Cli`] is the entry
//! point.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rejig - Project generation from templates.
#[derive(Debug, Parser)]
#[command(name = "rejig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to options file (overrides default ~/.rejig.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new project from a registered template
    Create(CreateArgs),

    /// List registered templates and inventories
    List,
}

/// Arguments for the `create` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CreateArgs {
    /// Directory to generate the project into
    pub target_path: PathBuf,

    /// Template to render, as `name` or `namespace.name`
    pub template_alias: String,
}
