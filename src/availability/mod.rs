//! Address availability checking.
//!
//! Classifies a submitted street address into one of three buckets and
//! branches the caller accordingly: in-service addresses flow straight into
//! the sign-up wizard (seeded with the submitted contact data),
//! future-service addresses get a notify-me capture, and everything else is
//! a polite no-match.

pub mod coverage;
pub mod notify;

pub use notify::{NotifyLog, NotifyRequest};

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{FiberlineError, Result};

/// Service classification for an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Fiber is live on this street today.
    InService,
    /// On the published build-out plan but not yet lit.
    FutureService,
    /// Not in the service footprint.
    NoMatch,
}

/// A parsed street address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub number: u32,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

fn address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // "123 Main Street, Orangeburg, SC 29115"
        Regex::new(r"^\s*(\d+)\s+([^,]+?)\s*,\s*([^,]+?)\s*,\s*([A-Za-z]{2})\s+(\d{5})\s*$")
            .expect("address regex is valid")
    })
}

impl AddressQuery {
    /// Parse a free-form "number street, city, ST zip" address.
    pub fn parse(raw: &str) -> Result<Self> {
        let caps = address_regex()
            .captures(raw)
            .ok_or_else(|| FiberlineError::AddressParse {
                raw: raw.to_string(),
            })?;

        let number = caps[1]
            .parse()
            .map_err(|_| FiberlineError::AddressParse {
                raw: raw.to_string(),
            })?;

        Ok(Self {
            number,
            street: caps[2].to_string(),
            city: caps[3].to_string(),
            state: caps[4].to_uppercase(),
            zip: caps[5].to_string(),
        })
    }

    /// Canonical single-line rendering.
    pub fn display(&self) -> String {
        format!(
            "{} {}, {}, {} {}",
            self.number, self.street, self.city, self.state, self.zip
        )
    }
}

/// Classify a parsed address against the coverage dataset.
pub fn classify(address: &AddressQuery) -> Availability {
    coverage::lookup(&address.street, &address.zip)
}

/// Classify a raw address string. Unparsable input is a no-match, not an
/// error: the checker form accepts anything.
pub fn classify_raw(raw: &str) -> Availability {
    match AddressQuery::parse(raw) {
        Ok(address) => classify(&address),
        Err(_) => Availability::NoMatch,
    }
}

/// Contact data collected by the checker form, used to seed the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}
