//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`fiberline signup`, `fiberline check`)
//! - Shared initialization logic
//! - Consistent global flag handling

pub mod check;
pub mod clear;
pub mod completions;
pub mod dispatcher;
pub mod signup;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
