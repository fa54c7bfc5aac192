//! The wizard's draft record.
//!
//! A `SignupDraft` is a client-local draft: it has no server-side counterpart
//! until the payment step hands a subset of it to the payment bridge. It is
//! mutated only through controller-exposed update functions and persisted in
//! full on every change.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::availability::ContactInfo;
use crate::contract::ContractKind;
use crate::error::{FiberlineError, Result};
use crate::signature::SignatureMode;

/// Activation charge on the 12-month contract path, in dollars.
pub const CONTRACT_ACTIVATION_FEE: u32 = 55;

/// Professional installation fee on the no-contract path, in dollars.
pub const NO_CONTRACT_INSTALL_FEE: u32 = 350;

/// The offered installation time slots.
pub const TIME_SLOTS: [&str; 3] = [
    "8:00 AM - 12:00 PM",
    "12:00 PM - 4:00 PM",
    "4:00 PM - 7:00 PM",
];

/// Which install path the subscriber chose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallType {
    /// Not chosen yet.
    #[default]
    Unset,
    /// 12-month contract, free install, $55 activation.
    Contract,
    /// No commitment, $350 professional install.
    NoContract,
}

impl InstallType {
    /// The up-front charge for this path, in dollars.
    pub fn fee(&self) -> u32 {
        match self {
            InstallType::Unset => 0,
            InstallType::Contract => CONTRACT_ACTIVATION_FEE,
            InstallType::NoContract => NO_CONTRACT_INSTALL_FEE,
        }
    }

    /// Checkout line-item description for this path.
    pub fn description(&self) -> &'static str {
        match self {
            InstallType::Unset => "Fiberline service",
            InstallType::Contract => "Fiberline activation (12-month contract, free install)",
            InstallType::NoContract => "Fiberline professional installation (no contract)",
        }
    }

    /// Stable identifier used in checkout metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallType::Unset => "unset",
            InstallType::Contract => "contract",
            InstallType::NoContract => "no-contract",
        }
    }
}

/// Acknowledgment + signature captured for one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Signer checked the acknowledgment box.
    pub acknowledged: bool,
    /// Typed text or the exported drawing snapshot.
    pub value: String,
    /// How the signature was captured.
    pub mode: SignatureMode,
    /// When "Sign Agreement" succeeded. Empty until then.
    pub signed_at: Option<DateTime<Utc>>,
    /// "Email me a copy" preference. Recorded only, never delivered.
    pub email_copy: bool,
}

impl SignatureRecord {
    /// A record is complete when it is acknowledged and carries a value.
    pub fn is_complete(&self) -> bool {
        self.acknowledged && !self.value.is_empty()
    }
}

/// Everything the wizard has collected so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupDraft {
    /// Schema version for safe migration of saved drafts.
    pub version: u32,

    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: String,

    pub install_type: InstallType,

    /// Signed status per contract kind.
    pub contracts_signed: BTreeMap<ContractKind, bool>,

    pub property_access_signature: SignatureRecord,
    pub free_install_signature: SignatureRecord,

    /// Amount due, in dollars. Always derived from `install_type`.
    pub payment_amount: u32,
    pub payment_completed: bool,
    pub payment_session_id: Option<String>,
    /// User-visible payment failure or cancellation message.
    pub payment_error: Option<String>,

    pub install_date: Option<NaiveDate>,
    pub install_time_slot: Option<String>,
}

impl SignupDraft {
    /// Current draft schema version.
    pub const CURRENT_VERSION: u32 = 1;

    /// Fresh draft seeded from availability-checker contact data.
    pub fn seeded(contact: &ContactInfo) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            address: contact.address.clone(),
            email: contact.email.clone(),
            ..Default::default()
        }
    }

    /// Fresh draft with no contact data.
    pub fn empty() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }

    /// Choose the install path, deriving the payment amount atomically.
    ///
    /// Install type is effectively write-once: once payment has completed
    /// there is no defined transition that changes it, because that would
    /// silently desynchronize the already-charged amount.
    pub fn choose_install_type(&mut self, install_type: InstallType) -> Result<()> {
        if self.payment_completed {
            return Err(FiberlineError::Other(anyhow::anyhow!(
                "install type cannot change after payment"
            )));
        }
        self.install_type = install_type;
        self.payment_amount = install_type.fee();
        Ok(())
    }

    /// The contracts this draft requires.
    ///
    /// Property access is always required; the free-install commitment only
    /// on the contract path.
    pub fn required_contracts(&self) -> Vec<ContractKind> {
        let mut kinds = vec![ContractKind::PropertyAccess];
        if self.install_type == InstallType::Contract {
            kinds.push(ContractKind::FreeInstall);
        }
        kinds
    }

    /// Signature record for a contract kind.
    pub fn signature(&self, kind: ContractKind) -> &SignatureRecord {
        match kind {
            ContractKind::PropertyAccess => &self.property_access_signature,
            ContractKind::FreeInstall => &self.free_install_signature,
        }
    }

    /// Mutable signature record for a contract kind.
    pub fn signature_mut(&mut self, kind: ContractKind) -> &mut SignatureRecord {
        match kind {
            ContractKind::PropertyAccess => &mut self.property_access_signature,
            ContractKind::FreeInstall => &mut self.free_install_signature,
        }
    }

    /// Whether a contract has been marked signed.
    pub fn is_signed(&self, kind: ContractKind) -> bool {
        self.contracts_signed.get(&kind).copied().unwrap_or(false)
    }

    /// Whether every required contract is signed.
    pub fn contracts_complete(&self) -> bool {
        self.required_contracts().iter().all(|k| self.is_signed(*k))
    }

    /// Mark a contract signed.
    ///
    /// Requires a complete signature record. Signing is a one-way stamp: a
    /// repeat call for an already-signed contract is a no-op and later
    /// clearing the acknowledgment does not unsign it.
    pub fn sign_contract(&mut self, kind: ContractKind, now: DateTime<Utc>) -> Result<()> {
        if self.is_signed(kind) {
            return Ok(());
        }
        let record = self.signature_mut(kind);
        if !record.is_complete() {
            let missing = if !record.acknowledged {
                "acknowledgment missing"
            } else {
                "signature value missing"
            };
            return Err(FiberlineError::SignatureIncomplete {
                kind: kind.as_str().to_string(),
                message: missing.to_string(),
            });
        }
        record.signed_at = Some(now);
        self.contracts_signed.insert(kind, true);
        Ok(())
    }

    /// Record the chosen install date and time slot.
    pub fn schedule_install(
        &mut self,
        date: NaiveDate,
        slot: &str,
        today: NaiveDate,
    ) -> Result<()> {
        validate_install_date(date, today)?;
        if !TIME_SLOTS.contains(&slot) {
            return Err(FiberlineError::InvalidSchedule {
                message: format!("'{}' is not an offered time slot", slot),
            });
        }
        self.install_date = Some(date);
        self.install_time_slot = Some(slot.to_string());
        Ok(())
    }
}

/// Install dates are tomorrow-or-later and never on a Sunday.
pub fn validate_install_date(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date <= today {
        return Err(FiberlineError::InvalidSchedule {
            message: "install date must be tomorrow or later".to_string(),
        });
    }
    if date.weekday() == Weekday::Sun {
        return Err(FiberlineError::InvalidSchedule {
            message: "installs are not scheduled on Sundays".to_string(),
        });
    }
    Ok(())
}
