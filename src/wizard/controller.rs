//! Step pointer, gating, and persistence.
//!
//! The controller owns the draft and the current step. Every mutation goes
//! through it so that the persisted copy can never lag the in-memory one.

use chrono::Utc;
use tracing::debug;

use crate::auth::Session;
use crate::availability::ContactInfo;
use crate::error::{FiberlineError, Result};
use crate::storage::{DraftStore, DRAFT_SLOT, STEP_SLOT};
use crate::wizard::state::SignupDraft;
use crate::wizard::SignupStep;

pub struct WizardController {
    store: Box<dyn DraftStore>,
    draft: SignupDraft,
    step: SignupStep,
    authenticated: bool,
}

impl WizardController {
    /// Build a controller over `store`, restoring any saved draft and step.
    ///
    /// A saved draft from an unknown schema version or one that fails to
    /// parse is discarded rather than surfaced: the subscriber gets a fresh
    /// wizard instead of an error about their own half-finished state.
    pub fn new(store: Box<dyn DraftStore>, seed: Option<&ContactInfo>) -> Result<Self> {
        let mut controller = Self {
            store,
            draft: match seed {
                Some(contact) => SignupDraft::seeded(contact),
                None => SignupDraft::empty(),
            },
            step: SignupStep::Account,
            authenticated: false,
        };
        let restored = controller.restore();
        if !restored && seed.is_some() {
            // A seeded fresh draft is saved right away so the checker's
            // contact data survives until the wizard is actually run.
            controller.persist_draft()?;
        }
        Ok(controller)
    }

    fn restore(&mut self) -> bool {
        let mut restored = false;
        match self.store.get(DRAFT_SLOT) {
            Ok(Some(raw)) => match serde_yaml::from_str::<SignupDraft>(&raw) {
                Ok(saved) if saved.version == SignupDraft::CURRENT_VERSION => {
                    self.draft = saved;
                    restored = true;
                }
                Ok(saved) => {
                    debug!(version = saved.version, "discarding draft from another schema version");
                }
                Err(e) => {
                    debug!(error = %e, "discarding unparsable saved draft");
                }
            },
            Ok(None) => {}
            Err(e) => debug!(error = %e, "draft slot unreadable, starting fresh"),
        }

        if let Ok(Some(raw)) = self.store.get(STEP_SLOT) {
            match raw.trim().parse::<u8>().ok().and_then(SignupStep::from_number) {
                Some(step) => self.step = step,
                None => debug!(raw = %raw, "discarding unparsable saved step"),
            }
        }
        restored
    }

    pub fn draft(&self) -> &SignupDraft {
        &self.draft
    }

    pub fn step(&self) -> SignupStep {
        self.step
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether the generic "continue" action may leave `step`.
    ///
    /// Payment never advances this way: leaving step 5 requires a verified
    /// payment, which arrives through
    /// [`complete_verified_payment`](WizardController::complete_verified_payment)
    /// instead.
    pub fn can_advance_from(&self, step: SignupStep) -> bool {
        match step {
            SignupStep::Account => self.authenticated,
            SignupStep::InstallType => {
                self.draft.install_type != crate::wizard::InstallType::Unset
            }
            SignupStep::Contracts => self.draft.contracts_complete(),
            SignupStep::Review => true,
            SignupStep::Payment => false,
            SignupStep::Schedule => {
                self.draft.install_date.is_some() && self.draft.install_time_slot.is_some()
            }
            SignupStep::Done => false,
        }
    }

    /// Advance one step if the current step's gate allows it.
    ///
    /// Returns whether the pointer moved. A refused advance is a quiet
    /// no-op, not an error.
    pub fn advance(&mut self) -> Result<bool> {
        if !self.can_advance_from(self.step) {
            debug!(step = self.step.number(), "advance refused by gate");
            return Ok(false);
        }
        let Some(next) = self.step.next() else {
            return Ok(false);
        };
        self.set_step(next)?;
        Ok(true)
    }

    /// Step back one step. The first step and the terminal step are floors.
    pub fn retreat(&mut self) -> Result<bool> {
        if self.step.is_terminal() {
            debug!("retreat refused at terminal step");
            return Ok(false);
        }
        let Some(prev) = self.step.prev() else {
            return Ok(false);
        };
        self.set_step(prev)?;
        Ok(true)
    }

    /// Apply a mutation to the draft and persist the result.
    pub fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SignupDraft),
    {
        f(&mut self.draft);
        self.persist_draft()
    }

    /// Apply a fallible mutation to the draft, persisting only on success.
    pub fn try_update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SignupDraft) -> Result<()>,
    {
        f(&mut self.draft)?;
        self.persist_draft()
    }

    /// Absorb the identity-provider session into the draft.
    ///
    /// Fills contact fields the draft does not have yet and, when the
    /// wizard is still sitting on the account step, moves past it.
    pub fn sync_session(&mut self, session: Option<&Session>) -> Result<()> {
        let Some(session) = session else {
            self.authenticated = false;
            return Ok(());
        };
        self.authenticated = true;
        if self.draft.email.is_empty() {
            self.draft.email = session.email.clone();
        }
        if self.draft.name.is_empty() {
            self.draft.name = session.display_name.clone();
        }
        self.persist_draft()?;
        if self.step == SignupStep::Account {
            self.set_step(SignupStep::InstallType)?;
        }
        Ok(())
    }

    /// Record a verified payment and land on the schedule step.
    ///
    /// Idempotent: a repeated return for an already-completed payment is
    /// acknowledged with `Ok(false)` and changes nothing. When the verifier
    /// reports an amount it is reconciled against the draft (the wire amount
    /// is in cents).
    pub fn complete_verified_payment(
        &mut self,
        session_id: &str,
        amount_total: Option<u64>,
    ) -> Result<bool> {
        if self.draft.payment_completed {
            debug!(session_id, "payment already recorded");
            return Ok(false);
        }
        if let Some(total) = amount_total {
            let expected = u64::from(self.draft.payment_amount) * 100;
            if total != expected {
                return Err(FiberlineError::VerificationFailed {
                    message: format!(
                        "verified amount {} does not match expected {}",
                        total, expected
                    ),
                });
            }
        }
        self.draft.payment_completed = true;
        self.draft.payment_session_id = Some(session_id.to_string());
        self.draft.payment_error = None;
        self.persist_draft()?;
        // Land on scheduling even if the saved pointer drifted elsewhere.
        self.set_step(SignupStep::Schedule)?;
        Ok(true)
    }

    /// Record a canceled checkout and return to the payment step.
    pub fn record_payment_canceled(&mut self) -> Result<()> {
        self.record_payment_error("Payment was canceled. You can try again when ready.")
    }

    /// Record a payment failure message and return to the payment step.
    pub fn record_payment_error(&mut self, message: &str) -> Result<()> {
        self.draft.payment_error = Some(message.to_string());
        self.persist_draft()?;
        self.set_step(SignupStep::Payment)
    }

    /// Finish the wizard, discarding the saved draft.
    pub fn finish(&mut self) -> Result<()> {
        self.clear_saved()
    }

    /// Remove both persisted slots. The in-memory draft is untouched.
    pub fn clear_saved(&mut self) -> Result<()> {
        self.store.remove(DRAFT_SLOT)?;
        self.store.remove(STEP_SLOT)?;
        Ok(())
    }

    fn set_step(&mut self, step: SignupStep) -> Result<()> {
        self.step = step;
        self.store.set(STEP_SLOT, &step.number().to_string())
    }

    fn persist_draft(&mut self) -> Result<()> {
        let raw = serde_yaml::to_string(&self.draft).map_err(|e| {
            FiberlineError::DraftWrite {
                slot: DRAFT_SLOT.to_string(),
                message: e.to_string(),
            }
        })?;
        self.store.set(DRAFT_SLOT, &raw)
    }

    /// Stamp a contract signed right now and persist.
    pub fn sign_contract(&mut self, kind: crate::contract::ContractKind) -> Result<()> {
        self.try_update(|draft| draft.sign_contract(kind, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractKind;
    use crate::storage::MemoryDraftStore;
    use crate::wizard::InstallType;
    use chrono::NaiveDate;

    fn controller() -> WizardController {
        WizardController::new(Box::new(MemoryDraftStore::new()), None).unwrap()
    }

    fn session() -> Session {
        Session {
            user_id: "user_1".into(),
            email: "kim@example.com".into(),
            display_name: "Kim Doe".into(),
            role: "customer".into(),
        }
    }

    fn sign_all(c: &mut WizardController) {
        for kind in c.draft().required_contracts() {
            c.update(|d| {
                let record = d.signature_mut(kind);
                record.acknowledged = true;
                record.value = "Kim Doe".to_string();
            })
            .unwrap();
            c.sign_contract(kind).unwrap();
        }
    }

    #[test]
    fn starts_at_account() {
        let c = controller();
        assert_eq!(c.step(), SignupStep::Account);
        assert!(!c.is_authenticated());
    }

    #[test]
    fn gates_refuse_until_satisfied() {
        let mut c = controller();

        // Step 1 gate: authentication
        assert!(!c.advance().unwrap());
        c.sync_session(Some(&session())).unwrap();
        assert_eq!(c.step(), SignupStep::InstallType);

        // Step 2 gate: install type chosen
        assert!(!c.advance().unwrap());
        c.try_update(|d| d.choose_install_type(InstallType::Contract))
            .unwrap();
        assert!(c.advance().unwrap());
        assert_eq!(c.step(), SignupStep::Contracts);

        // Step 3 gate: all required contracts signed
        assert!(!c.advance().unwrap());
        sign_all(&mut c);
        assert!(c.advance().unwrap());
        assert_eq!(c.step(), SignupStep::Review);

        // Step 4 has no gate
        assert!(c.advance().unwrap());
        assert_eq!(c.step(), SignupStep::Payment);
    }

    #[test]
    fn payment_step_never_advances_via_gate() {
        let mut c = controller();
        c.sync_session(Some(&session())).unwrap();
        c.try_update(|d| d.choose_install_type(InstallType::NoContract))
            .unwrap();
        sign_all(&mut c);
        while c.step() != SignupStep::Payment {
            assert!(c.advance().unwrap());
        }

        // Even with everything else filled in, the gate holds.
        assert!(!c.advance().unwrap());
        assert_eq!(c.step(), SignupStep::Payment);

        // The verified-payment transition is the only way through.
        assert!(c.complete_verified_payment("cs_test_1", None).unwrap());
        assert_eq!(c.step(), SignupStep::Schedule);
    }

    #[test]
    fn verified_payment_is_idempotent() {
        let mut c = controller();
        c.try_update(|d| d.choose_install_type(InstallType::Contract))
            .unwrap();
        assert!(c.complete_verified_payment("cs_test_1", Some(5500)).unwrap());
        assert!(!c.complete_verified_payment("cs_test_1", Some(5500)).unwrap());
        assert_eq!(c.draft().payment_session_id.as_deref(), Some("cs_test_1"));
    }

    #[test]
    fn verified_payment_reconciles_amount() {
        let mut c = controller();
        c.try_update(|d| d.choose_install_type(InstallType::Contract))
            .unwrap();
        let err = c
            .complete_verified_payment("cs_test_1", Some(35000))
            .unwrap_err();
        assert!(matches!(err, FiberlineError::VerificationFailed { .. }));
        assert!(!c.draft().payment_completed);
    }

    #[test]
    fn verified_payment_clears_prior_error() {
        let mut c = controller();
        c.try_update(|d| d.choose_install_type(InstallType::Contract))
            .unwrap();
        c.record_payment_canceled().unwrap();
        assert!(c.draft().payment_error.is_some());

        c.complete_verified_payment("cs_test_2", None).unwrap();
        assert!(c.draft().payment_error.is_none());
    }

    #[test]
    fn canceled_payment_returns_to_payment_step() {
        let mut c = controller();
        c.record_payment_canceled().unwrap();
        assert_eq!(c.step(), SignupStep::Payment);
        assert!(c.draft().payment_error.is_some());
        assert!(!c.draft().payment_completed);
    }

    #[test]
    fn retreat_floors_at_first_and_terminal_steps() {
        let mut c = controller();
        assert!(!c.retreat().unwrap());

        c.sync_session(Some(&session())).unwrap();
        assert!(c.retreat().unwrap());
        assert_eq!(c.step(), SignupStep::Account);
    }

    #[test]
    fn state_survives_a_restart() {
        let store = MemoryDraftStore::new();
        {
            let mut c = WizardController::new(Box::new(store.clone()), None).unwrap();
            c.sync_session(Some(&session())).unwrap();
            c.try_update(|d| d.choose_install_type(InstallType::Contract))
                .unwrap();
        }

        let c = WizardController::new(Box::new(store), None).unwrap();
        assert_eq!(c.step(), SignupStep::InstallType);
        assert_eq!(c.draft().install_type, InstallType::Contract);
        assert_eq!(c.draft().payment_amount, 55);
        assert_eq!(c.draft().email, "kim@example.com");
    }

    #[test]
    fn corrupt_saved_draft_falls_back_to_fresh() {
        let mut store = MemoryDraftStore::new();
        store.set(DRAFT_SLOT, "{{{not yaml").unwrap();
        store.set(STEP_SLOT, "4").unwrap();

        let c = WizardController::new(Box::new(store), None).unwrap();
        assert_eq!(c.draft().install_type, InstallType::Unset);
        // The step pointer is still honored independently.
        assert_eq!(c.step(), SignupStep::Review);
    }

    #[test]
    fn unknown_draft_version_is_discarded() {
        let mut draft = SignupDraft::empty();
        draft.version = 99;
        draft.name = "Future Person".to_string();
        let mut store = MemoryDraftStore::new();
        store
            .set(DRAFT_SLOT, &serde_yaml::to_string(&draft).unwrap())
            .unwrap();

        let c = WizardController::new(Box::new(store), None).unwrap();
        assert!(c.draft().name.is_empty());
    }

    #[test]
    fn seed_fills_contact_fields() {
        let contact = ContactInfo {
            name: "Kim Doe".into(),
            phone: "803-555-0100".into(),
            email: "kim@example.com".into(),
            address: "123 Main Street, Orangeburg, SC 29115".into(),
        };
        let c =
            WizardController::new(Box::new(MemoryDraftStore::new()), Some(&contact)).unwrap();
        assert_eq!(c.draft().address, "123 Main Street, Orangeburg, SC 29115");
        assert_eq!(c.draft().phone, "803-555-0100");
    }

    #[test]
    fn fresh_seed_is_persisted_immediately() {
        let store = MemoryDraftStore::new();
        let contact = ContactInfo {
            name: "Kim Doe".into(),
            phone: String::new(),
            email: "kim@example.com".into(),
            address: "123 Main Street, Orangeburg, SC 29115".into(),
        };
        {
            WizardController::new(Box::new(store.clone()), Some(&contact)).unwrap();
        }
        let c = WizardController::new(Box::new(store), None).unwrap();
        assert_eq!(c.draft().name, "Kim Doe");
    }

    #[test]
    fn seed_does_not_clobber_existing_draft() {
        let store = MemoryDraftStore::new();
        {
            let mut c = WizardController::new(Box::new(store.clone()), None).unwrap();
            c.update(|d| d.name = "Existing Person".to_string()).unwrap();
        }
        let contact = ContactInfo {
            name: "Late Arrival".into(),
            ..Default::default()
        };
        let c = WizardController::new(Box::new(store), Some(&contact)).unwrap();
        assert_eq!(c.draft().name, "Existing Person");
    }

    #[test]
    fn session_does_not_overwrite_seeded_contact() {
        let contact = ContactInfo {
            name: "Seeded Name".into(),
            phone: String::new(),
            email: "seeded@example.com".into(),
            address: String::new(),
        };
        let mut c =
            WizardController::new(Box::new(MemoryDraftStore::new()), Some(&contact)).unwrap();
        c.sync_session(Some(&session())).unwrap();
        assert_eq!(c.draft().name, "Seeded Name");
        assert_eq!(c.draft().email, "seeded@example.com");
    }

    #[test]
    fn schedule_gate_needs_date_and_slot() {
        let mut c = controller();
        c.try_update(|d| d.choose_install_type(InstallType::Contract))
            .unwrap();
        c.complete_verified_payment("cs_test_1", None).unwrap();
        assert_eq!(c.step(), SignupStep::Schedule);
        assert!(!c.advance().unwrap());

        let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 28).unwrap();
        c.try_update(|d| d.schedule_install(date, crate::wizard::state::TIME_SLOTS[1], today))
            .unwrap();
        assert!(c.advance().unwrap());
        assert_eq!(c.step(), SignupStep::Done);
        assert!(!c.advance().unwrap());
    }

    #[test]
    fn finish_clears_saved_slots() {
        let store = MemoryDraftStore::new();
        {
            let mut c = WizardController::new(Box::new(store.clone()), None).unwrap();
            c.update(|d| d.name = "Kim Doe".to_string()).unwrap();
        }
        {
            let mut c = WizardController::new(Box::new(store.clone()), None).unwrap();
            assert_eq!(c.draft().name, "Kim Doe");
            c.finish().unwrap();
        }
        let c = WizardController::new(Box::new(store), None).unwrap();
        assert!(c.draft().name.is_empty());
    }
}
