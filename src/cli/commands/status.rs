//! Saved-progress reporting.

use crate::auth::{AuthProvider, EnvAuthProvider};
use crate::cli::args::StatusArgs;
use crate::storage::{ApplicantId, FileDraftStore};
use crate::ui::UserInterface;
use crate::wizard::{InstallType, WizardController};

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand {
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(args: StatusArgs) -> Self {
        Self { args }
    }
}

/// Shared applicant resolution for commands that read saved drafts.
pub(super) fn applicant_for(explicit: Option<&str>) -> ApplicantId {
    if let Some(key) = explicit {
        return ApplicantId::from_key(key);
    }
    match EnvAuthProvider::new().session() {
        Some(session) => ApplicantId::from_key(&session.email),
        None => ApplicantId::anonymous(),
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        let id = applicant_for(self.args.applicant.as_deref());
        let store = FileDraftStore::for_applicant(&id);
        let controller = WizardController::new(Box::new(store), None)?;

        let draft = controller.draft();
        let step = controller.step();
        if draft.name.is_empty() && draft.email.is_empty() && step.number() == 1 {
            ui.message("No sign-up in progress. Run `fiberline signup` to start.");
            return Ok(CommandResult::success());
        }

        ui.show_header("Sign-Up Progress");
        ui.message(&format!(
            "Step {} of 7: {}",
            step.number(),
            step.title()
        ));
        if !draft.name.is_empty() {
            ui.message(&format!("Name:    {}", draft.name));
        }
        if !draft.email.is_empty() {
            ui.message(&format!("Email:   {}", draft.email));
        }
        if !draft.address.is_empty() {
            ui.message(&format!("Address: {}", draft.address));
        }
        match draft.install_type {
            InstallType::Unset => {}
            other => {
                ui.message(&format!(
                    "Install: {} (${} due)",
                    other.as_str(),
                    draft.payment_amount
                ));
            }
        }
        if draft.payment_completed {
            ui.success("Payment: confirmed");
        } else if let Some(error) = draft.payment_error.as_deref() {
            ui.warning(&format!("Payment: {}", error));
        }
        if let (Some(date), Some(slot)) = (draft.install_date, draft.install_time_slot.as_deref())
        {
            ui.message(&format!("Install visit: {} between {}", date, slot));
        }
        Ok(CommandResult::success())
    }
}
