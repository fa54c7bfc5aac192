//! Error types for Fiberline operations.
//!
//! This module defines [`FiberlineError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `FiberlineError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `FiberlineError::Other`) for unexpected errors
//! - Gating failures are not errors: a blocked step simply does not advance

use thiserror::Error;

/// Core error type for Fiberline operations.
#[derive(Debug, Error)]
pub enum FiberlineError {
    /// A saved draft slot exists but could not be deserialized.
    #[error("Failed to parse saved draft '{slot}': {message}")]
    DraftParse { slot: String, message: String },

    /// A draft slot could not be written.
    #[error("Failed to persist draft '{slot}': {message}")]
    DraftWrite { slot: String, message: String },

    /// Local configuration file is present but invalid.
    #[error("Invalid configuration at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// A submitted address did not match the expected street-address shape.
    #[error("Unrecognized address format: {raw}")]
    AddressParse { raw: String },

    /// The checkout-session endpoint rejected the request or was unreachable.
    #[error("Checkout session could not be created: {message}")]
    CheckoutFailed { message: String },

    /// The verification endpoint returned an explicit negative result.
    #[error("Payment verification failed: {message}")]
    VerificationFailed { message: String },

    /// The verification endpoint itself could not be reached.
    ///
    /// This is a hard failure: an unreachable verifier never implies a
    /// verified payment.
    #[error("Payment verification service unreachable: {message}")]
    VerificationUnreachable { message: String },

    /// A contract signing attempt with an incomplete signature record.
    #[error("Contract '{kind}' cannot be signed: {message}")]
    SignatureIncomplete { kind: String, message: String },

    /// An install date or time slot outside the offered window.
    #[error("Invalid install schedule: {message}")]
    InvalidSchedule { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Fiberline operations.
pub type Result<T> = std::result::Result<T, FiberlineError>;
