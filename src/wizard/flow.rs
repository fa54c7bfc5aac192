//! The interactive run loop.
//!
//! `SignupFlow` walks the wizard stages over a [`UserInterface`], delegating
//! gating and persistence to the controller and the checkout round trip to
//! the payment bridge. Every prompt has a stable key so the whole flow can
//! run against [`MockUI`](crate::ui::MockUI) with scripted answers.

use chrono::{Local, NaiveDate};

use crate::auth::AuthProvider;
use crate::contract::{self, ContractKind};
use crate::error::{FiberlineError, Result};
use crate::payment::{PaymentBridge, ReturnOutcome};
use crate::signature::{SignatureMode, SignaturePad};
use crate::ui::{Prompt, PromptOption, UserInterface};
use crate::wizard::state::TIME_SLOTS;
use crate::wizard::{InstallType, SignupStep, WizardController, TOTAL_STEPS};

/// Upper bound on stage iterations before the flow gives up. Generous
/// enough for any human session; it exists to stop a scripted UI that keeps
/// answering the same stage from looping forever.
const MAX_STAGE_VISITS: usize = 100;

/// How a flow run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The wizard reached the terminal stage.
    Completed,
    /// A checkout session was created; the subscriber must finish payment
    /// at the hosted URL and come back with `--return-url`.
    AwaitingPayment { checkout_url: String },
    /// The subscriber backed out. The draft stays saved.
    Aborted,
}

pub struct SignupFlow<'a> {
    controller: WizardController,
    bridge: PaymentBridge,
    auth: &'a dyn AuthProvider,
    ui: &'a mut dyn UserInterface,
}

impl<'a> SignupFlow<'a> {
    pub fn new(
        controller: WizardController,
        bridge: PaymentBridge,
        auth: &'a dyn AuthProvider,
        ui: &'a mut dyn UserInterface,
    ) -> Self {
        Self {
            controller,
            bridge,
            auth,
            ui,
        }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn into_controller(self) -> WizardController {
        self.controller
    }

    /// Settle a checkout return URL before running the stages.
    ///
    /// The outcome markers are consumed exactly once: after settling, the
    /// stripped URL is shown so a re-run with it cannot replay the outcome.
    pub fn absorb_return(&mut self, raw_url: &str) -> Result<ReturnOutcome> {
        let outcome = self
            .bridge
            .handle_return(raw_url, &mut self.controller, self.auth)?;
        match &outcome {
            ReturnOutcome::Verified { .. } => {
                self.ui.success("Payment confirmed. Let's schedule your installation.");
            }
            ReturnOutcome::AlreadyCompleted => {
                self.ui.message("This payment was already confirmed.");
            }
            ReturnOutcome::Canceled => {
                self.ui.warning("Payment was canceled. No charge was made.");
            }
            ReturnOutcome::Failed { message } => {
                self.ui.error(message);
            }
            ReturnOutcome::NoParams => {
                self.ui
                    .warning("The return URL carried no checkout outcome; continuing where you left off.");
            }
        }
        if outcome != ReturnOutcome::NoParams {
            let resume = crate::payment::strip_return_params(raw_url);
            self.ui
                .message(&format!("Resume address (outcome settled): {}", resume));
        }
        Ok(outcome)
    }

    /// Run stages until the wizard completes, hands off to checkout, or the
    /// subscriber backs out.
    pub fn run(&mut self) -> Result<FlowOutcome> {
        for _ in 0..MAX_STAGE_VISITS {
            let step = self.controller.step();
            self.ui.show_progress(step.number() as usize, TOTAL_STEPS);
            self.ui
                .show_header(&format!("{} {}", step.icon(), step.title()));

            match step {
                SignupStep::Account => {
                    if !self.stage_account()? {
                        return Ok(FlowOutcome::Aborted);
                    }
                }
                SignupStep::InstallType => self.stage_install_type()?,
                SignupStep::Contracts => {
                    if !self.stage_contracts()? {
                        return Ok(FlowOutcome::Aborted);
                    }
                }
                SignupStep::Review => self.stage_review()?,
                SignupStep::Payment => {
                    return match self.stage_payment()? {
                        Some(url) => Ok(FlowOutcome::AwaitingPayment { checkout_url: url }),
                        None => Ok(FlowOutcome::Aborted),
                    };
                }
                SignupStep::Schedule => self.stage_schedule()?,
                SignupStep::Done => {
                    self.stage_done()?;
                    return Ok(FlowOutcome::Completed);
                }
            }
        }
        Err(FiberlineError::Other(anyhow::anyhow!(
            "sign-up flow did not settle after {MAX_STAGE_VISITS} stage visits"
        )))
    }

    /// Returns false when the subscriber gives up on signing in.
    fn stage_account(&mut self) -> Result<bool> {
        self.controller.sync_session(self.auth.session().as_ref())?;
        if self.controller.is_authenticated() {
            self.ui.success(&format!(
                "Signed in as {}.",
                self.controller.draft().email
            ));
            return Ok(true);
        }

        self.ui
            .message("A Fiberline account is needed before sign-up can continue.");
        let retry = self
            .ui
            .prompt(&Prompt::confirm(
                "account-retry",
                "No signed-in session was found. Check again?",
            ))?
            .as_bool()
            .unwrap_or(false);
        Ok(retry)
    }

    fn stage_install_type(&mut self) -> Result<()> {
        self.ui.message(
            "Choose how your fiber service gets installed. The 12-month contract \
             waives the $350 professional installation fee.",
        );
        let choice = self
            .ui
            .prompt(&Prompt::select(
                "install-type",
                "Which install would you like?",
                vec![
                    PromptOption::new(
                        "12-month contract: free install, $55 activation",
                        "contract",
                    ),
                    PromptOption::new("No contract: $350 professional install", "no-contract"),
                ],
            ))?
            .as_string();

        let install_type = match choice.as_str() {
            "no-contract" => InstallType::NoContract,
            _ => InstallType::Contract,
        };
        self.controller
            .try_update(|d| d.choose_install_type(install_type))?;
        self.controller.advance()?;
        Ok(())
    }

    /// Returns false when the subscriber chooses to stop here.
    fn stage_contracts(&mut self) -> Result<bool> {
        for _ in 0..MAX_STAGE_VISITS {
            if self.controller.draft().contracts_complete() {
                self.ui.success("All required agreements are signed.");
                self.controller.advance()?;
                return Ok(true);
            }

            let mut options = Vec::new();
            for kind in self.controller.draft().required_contracts() {
                if self.controller.draft().is_signed(kind) {
                    self.ui.message(&format!("✓ {} signed", kind.title()));
                } else {
                    options.push(PromptOption::new(
                        &format!("Sign the {}", kind.title()),
                        &format!("sign-{}", kind.as_str()),
                    ));
                    options.push(PromptOption::new(
                        &format!("Save an unsigned copy of the {}", kind.title()),
                        &format!("export-{}", kind.as_str()),
                    ));
                }
            }
            options.push(PromptOption::new("Stop here and keep my progress", "stop"));

            let action = self
                .ui
                .prompt(&Prompt::select(
                    "contracts-action",
                    "What next?",
                    options,
                ))?
                .as_string();

            if action == "stop" {
                return Ok(false);
            }
            for kind in ContractKind::all() {
                if action == format!("sign-{}", kind.as_str()) {
                    self.sign_dialog(kind)?;
                } else if action == format!("export-{}", kind.as_str()) {
                    self.export_dialog(kind)?;
                }
            }
        }
        Ok(false)
    }

    fn sign_dialog(&mut self, kind: ContractKind) -> Result<()> {
        self.ui.show_header(kind.title());
        self.ui.message(contract::template_text(kind));

        let acknowledged = self
            .ui
            .prompt(&Prompt::confirm(
                &format!("ack-{}", kind.as_str()),
                "I have read and agree to the terms above",
            ))?
            .as_bool()
            .unwrap_or(false);
        if !acknowledged {
            self.ui
                .warning("The agreement must be acknowledged before it can be signed.");
            return Ok(());
        }

        let mode = self
            .ui
            .prompt(&Prompt::select(
                &format!("sign-mode-{}", kind.as_str()),
                "How would you like to sign?",
                vec![
                    PromptOption::new("Type my full legal name", "typed"),
                    PromptOption::new("Draw my signature", "drawn"),
                ],
            ))?
            .as_string();

        let mut pad = SignaturePad::new();
        if mode == "drawn" {
            pad.set_mode(SignatureMode::Drawn);
            let spec = self
                .ui
                .prompt(&Prompt::input(
                    &format!("signature-strokes-{}", kind.as_str()),
                    "Draw your signature (strokes as x,y points, ';' between strokes)",
                ))?
                .as_string();
            apply_strokes(&mut pad, &spec);
        } else {
            let text = self
                .ui
                .prompt(&Prompt::input(
                    &format!("signature-text-{}", kind.as_str()),
                    "Type your full legal name",
                ))?
                .as_string();
            pad.enter_text(&text);
        }

        let Some(value) = pad.value().map(String::from) else {
            self.ui.error("No signature was captured. The agreement stays unsigned.");
            return Ok(());
        };

        let email_copy = self
            .ui
            .prompt(&Prompt::confirm(
                &format!("email-copy-{}", kind.as_str()),
                "Email me a copy of the signed agreement",
            ))?
            .as_bool()
            .unwrap_or(false);

        let captured_mode = pad.mode();
        self.controller.update(|d| {
            let record = d.signature_mut(kind);
            record.acknowledged = true;
            record.value = value;
            record.mode = captured_mode;
            record.email_copy = email_copy;
        })?;
        self.controller.sign_contract(kind)?;
        self.ui.success(&format!("{} signed.", kind.title()));
        Ok(())
    }

    fn export_dialog(&mut self, kind: ContractKind) -> Result<()> {
        let dir = std::env::current_dir()?;
        let path = contract::export_template(kind, &dir)?;
        self.ui
            .success(&format!("Saved unsigned copy to {}.", path.display()));
        Ok(())
    }

    fn stage_review(&mut self) -> Result<()> {
        let draft = self.controller.draft();
        self.ui.message(&format!("Name:     {}", draft.name));
        self.ui.message(&format!("Email:    {}", draft.email));
        if !draft.phone.is_empty() {
            self.ui.message(&format!("Phone:    {}", draft.phone));
        }
        if !draft.address.is_empty() {
            self.ui.message(&format!("Address:  {}", draft.address));
        }
        let install = match draft.install_type {
            InstallType::Contract => "12-month contract (free install)",
            InstallType::NoContract => "No contract (professional install)",
            InstallType::Unset => "Not chosen",
        };
        self.ui.message(&format!("Install:  {}", install));
        self.ui
            .message(&format!("Due now:  ${}", draft.payment_amount));

        let confirmed = self
            .ui
            .prompt(&Prompt::confirm("review-confirm", "Does everything look right?"))?
            .as_bool()
            .unwrap_or(false);
        if confirmed {
            self.controller.advance()?;
        } else {
            self.controller.retreat()?;
        }
        Ok(())
    }

    /// Returns the checkout URL, or `None` when the subscriber backs out.
    fn stage_payment(&mut self) -> Result<Option<String>> {
        if let Some(error) = self.controller.draft().payment_error.clone() {
            self.ui.warning(&error);
        }
        self.ui.message(&format!(
            "${} is due now. Payment happens on our provider's secure checkout page.",
            self.controller.draft().payment_amount
        ));

        let proceed = self
            .ui
            .prompt(&Prompt::confirm(
                "payment-confirm",
                "Open a secure checkout session?",
            ))?
            .as_bool()
            .unwrap_or(false);
        if !proceed {
            self.ui
                .message("Your progress is saved. Run sign-up again to continue.");
            return Ok(None);
        }

        let mut spinner = self.ui.start_spinner("Creating checkout session...");
        match self
            .bridge
            .begin_checkout(self.controller.draft(), self.auth)
        {
            Ok(url) => {
                spinner.finish_success("Checkout session created");
                self.ui.message(&format!("Complete your payment at:\n  {}", url));
                self.ui.message(
                    "When you are done, run sign-up again with --return-url and the \
                     address the checkout page sent you back to.",
                );
                Ok(Some(url))
            }
            Err(e) => {
                spinner.finish_error("Checkout session failed");
                self.ui.error(&e.to_string());
                Ok(None)
            }
        }
    }

    fn stage_schedule(&mut self) -> Result<()> {
        let today = Local::now().date_naive();
        self.ui.message(
            "Pick an installation date (tomorrow or later, Monday through Saturday).",
        );
        let raw_date = self
            .ui
            .prompt(&Prompt::input("install-date", "Install date (YYYY-MM-DD)"))?
            .as_string();
        let date = match NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                self.ui
                    .error(&format!("'{}' is not a date in YYYY-MM-DD form.", raw_date));
                return Ok(());
            }
        };

        let slot = self
            .ui
            .prompt(&Prompt::select(
                "install-slot",
                "Which arrival window?",
                TIME_SLOTS
                    .iter()
                    .map(|s| PromptOption::new(s, s))
                    .collect(),
            ))?
            .as_string();

        match self
            .controller
            .try_update(|d| d.schedule_install(date, &slot, today))
        {
            Ok(()) => {
                self.controller.advance()?;
            }
            Err(e) => self.ui.error(&e.to_string()),
        }
        Ok(())
    }

    fn stage_done(&mut self) -> Result<()> {
        let draft = self.controller.draft();
        self.ui
            .success("You're all set. Welcome to the Fiberline network!");
        if let (Some(date), Some(slot)) = (draft.install_date, draft.install_time_slot.as_deref())
        {
            self.ui
                .message(&format!("Installation: {} between {}", date, slot));
        }
        if let Some(session_id) = draft.payment_session_id.as_deref() {
            self.ui
                .message(&format!("Payment reference: {}", session_id));
        }
        self.controller.finish()?;
        Ok(())
    }
}

/// Apply a textual stroke spec to the pad.
///
/// Strokes are separated by `;`, points inside a stroke by whitespace, and
/// a point is `x,y`. Malformed points are skipped.
fn apply_strokes(pad: &mut SignaturePad, spec: &str) {
    for stroke in spec.split(';') {
        let mut points = stroke.split_whitespace().filter_map(|p| {
            let (x, y) = p.split_once(',')?;
            Some((x.trim().parse::<u32>().ok()?, y.trim().parse::<u32>().ok()?))
        });
        let Some((x, y)) = points.next() else {
            continue;
        };
        pad.stroke_start(x, y);
        for (x, y) in points {
            pad.stroke_move(x, y);
        }
        pad.stroke_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_spec_produces_a_drawing() {
        let mut pad = SignaturePad::new();
        pad.set_mode(SignatureMode::Drawn);
        apply_strokes(&mut pad, "10,10 30,20 50,22; 60,30 80,35");
        let value = pad.value().unwrap();
        assert!(value.starts_with("mono;"));
    }

    #[test]
    fn malformed_points_are_skipped() {
        let mut pad = SignaturePad::new();
        pad.set_mode(SignatureMode::Drawn);
        apply_strokes(&mut pad, "nope; also,bad x,y; 5,5 9,9");
        assert!(pad.value().is_some());
    }

    #[test]
    fn empty_spec_leaves_pad_blank() {
        let mut pad = SignaturePad::new();
        pad.set_mode(SignatureMode::Drawn);
        apply_strokes(&mut pad, "");
        assert!(pad.value().is_none());
    }
}
