//! The sign-up wizard.
//!
//! - [`SignupStep`] - the ordered seven stages and their display metadata
//! - [`state`] - the draft record the wizard accumulates
//! - [`controller`] - step pointer, gating, and persistence
//! - [`flow`] - the interactive run loop over a [`UserInterface`](crate::ui::UserInterface)

pub mod controller;
pub mod flow;
pub mod state;

pub use controller::WizardController;
pub use flow::{FlowOutcome, SignupFlow};
pub use state::{InstallType, SignatureRecord, SignupDraft};

/// Number of wizard stages, including the terminal success stage.
pub const TOTAL_STEPS: usize = 7;

/// The ordered wizard stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignupStep {
    /// Account creation with the identity provider.
    Account,
    /// Contract vs. no-contract install choice.
    InstallType,
    /// Required agreement signing.
    Contracts,
    /// Read-only recap of everything collected.
    Review,
    /// Checkout and external payment verification.
    Payment,
    /// Install date and time-slot selection.
    Schedule,
    /// Terminal success stage.
    Done,
}

impl SignupStep {
    /// 1-based step number.
    pub fn number(&self) -> u8 {
        match self {
            SignupStep::Account => 1,
            SignupStep::InstallType => 2,
            SignupStep::Contracts => 3,
            SignupStep::Review => 4,
            SignupStep::Payment => 5,
            SignupStep::Schedule => 6,
            SignupStep::Done => 7,
        }
    }

    /// Step for a persisted 1-based number.
    pub fn from_number(n: u8) -> Option<SignupStep> {
        match n {
            1 => Some(SignupStep::Account),
            2 => Some(SignupStep::InstallType),
            3 => Some(SignupStep::Contracts),
            4 => Some(SignupStep::Review),
            5 => Some(SignupStep::Payment),
            6 => Some(SignupStep::Schedule),
            7 => Some(SignupStep::Done),
            _ => None,
        }
    }

    /// Display title.
    pub fn title(&self) -> &'static str {
        match self {
            SignupStep::Account => "Create Your Account",
            SignupStep::InstallType => "Choose Your Install",
            SignupStep::Contracts => "Sign Agreements",
            SignupStep::Review => "Review Your Order",
            SignupStep::Payment => "Payment",
            SignupStep::Schedule => "Schedule Installation",
            SignupStep::Done => "Welcome to Fiberline",
        }
    }

    /// Display icon.
    pub fn icon(&self) -> &'static str {
        match self {
            SignupStep::Account => "👤",
            SignupStep::InstallType => "🏠",
            SignupStep::Contracts => "✍",
            SignupStep::Review => "🔎",
            SignupStep::Payment => "💳",
            SignupStep::Schedule => "📅",
            SignupStep::Done => "🎉",
        }
    }

    /// The following step, `None` at the terminal stage.
    pub fn next(&self) -> Option<SignupStep> {
        SignupStep::from_number(self.number() + 1)
    }

    /// The preceding step, `None` at the first stage.
    pub fn prev(&self) -> Option<SignupStep> {
        self.number().checked_sub(1).and_then(SignupStep::from_number)
    }

    /// Whether this is the terminal success stage.
    pub fn is_terminal(&self) -> bool {
        *self == SignupStep::Done
    }
}
