//! Fiberline - municipal fiber self-service sign-up terminal.
//!
//! Fiberline walks a subscriber through the seven-step sign-up wizard for a
//! municipal fiber network: account, install choice, agreement signing,
//! review, hosted checkout, scheduling, and confirmation. Progress is saved
//! locally after every answer, so an interrupted session resumes where it
//! left off.
//!
//! # Modules
//!
//! - [`auth`] - Identity-provider boundary and token acquisition
//! - [`availability`] - Service-footprint checking and notify-me capture
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Endpoint configuration and environment overrides
//! - [`contract`] - Agreement kinds and embedded template text
//! - [`error`] - Error types and result aliases
//! - [`payment`] - Checkout session creation and payment verification
//! - [`signature`] - Typed and drawn signature capture
//! - [`storage`] - Saved-draft persistence
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`wizard`] - The sign-up state machine and its run loop
//!
//! # Example
//!
//! ```
//! use fiberline::availability::{self, Availability};
//!
//! let result = availability::classify_raw("123 Main Street, Orangeburg, SC 29115");
//! assert_eq!(result, Availability::InService);
//! ```

pub mod auth;
pub mod availability;
pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod payment;
pub mod signature;
pub mod storage;
pub mod ui;
pub mod wizard;

pub use error::{FiberlineError, Result};
