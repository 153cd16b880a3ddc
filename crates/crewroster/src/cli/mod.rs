//! Command-line interface for crewroster.
//!
//! This module provides the CLI structure for the `crewroster` binary.
//! Without a subcommand the interactive roster menu starts.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ShowCommand};

/// crewroster - Keep the training roster of an airline's pilots
///
/// An interactive menu for adding, editing, paging through, and deleting
/// pilot records, with rosters saved as files in a data directory.
#[derive(Debug, Parser)]
#[command(name = "crewroster")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding saved rosters (overrides the configuration)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive roster menu (the default)
    Run,

    /// List saved roster files
    Rosters,

    /// Print a saved roster
    Show(ShowCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }

    /// The command to run, defaulting to the interactive menu.
    #[must_use]
    pub fn resolved_command(&self) -> &Command {
        static RUN: Command = Command::Run;
        self.command.as_ref().unwrap_or(&RUN)
    }
}
