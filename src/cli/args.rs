//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Fiberline - municipal fiber self-service terminal.
#[derive(Debug, Parser)]
#[command(name = "fiberline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default ~/.fiberline/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start or resume the sign-up wizard (default if no command specified)
    Signup(SignupArgs),

    /// Check whether an address is in the service footprint
    Check(CheckArgs),

    /// Show saved sign-up progress
    Status(StatusArgs),

    /// Discard saved sign-up progress
    Clear(ClearArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `signup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SignupArgs {
    /// Email or account key the saved draft is filed under
    #[arg(short, long, env = "FIBERLINE_APPLICANT")]
    pub applicant: Option<String>,

    /// Return URL from the checkout page, to settle a pending payment
    #[arg(long, value_name = "URL")]
    pub return_url: Option<String>,

    /// Discard any saved draft and start over
    #[arg(long)]
    pub fresh: bool,

    /// Answer prompts from FIBERLINE_PROMPT_* variables, no terminal needed
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Service address, e.g. "123 Main Street, Orangeburg, SC 29115"
    pub address: String,

    /// Contact name, used when asking to be notified
    #[arg(long)]
    pub name: Option<String>,

    /// Contact phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Record a notify-me request if the address is not serviceable yet
    #[arg(long)]
    pub notify: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Email or account key the saved draft is filed under
    #[arg(short, long, env = "FIBERLINE_APPLICANT")]
    pub applicant: Option<String>,
}

/// Arguments for the `clear` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ClearArgs {
    /// Email or account key the saved draft is filed under
    #[arg(short, long, env = "FIBERLINE_APPLICANT")]
    pub applicant: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
