//! Availability checking.
//!
//! `fiberline check` classifies an address against the coverage dataset and
//! optionally records a notify-me request for future-service addresses.

use crate::availability::{self, Availability, ContactInfo, NotifyLog, NotifyRequest};
use crate::cli::args::CheckArgs;
use crate::storage::{ApplicantId, FileDraftStore};
use crate::ui::UserInterface;
use crate::wizard::WizardController;
use chrono::Utc;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    fn record_notify(&self, ui: &mut dyn UserInterface) -> crate::error::Result<()> {
        let Some(email) = self.args.email.as_deref() else {
            ui.warning("An email is needed to save a notify-me request (--email).");
            return Ok(());
        };
        let id = ApplicantId::from_key(email);
        let mut store = FileDraftStore::for_applicant(&id);
        let mut log = NotifyLog::load(&store);
        log.append(
            &mut store,
            NotifyRequest {
                address: self.args.address.clone(),
                name: self.args.name.clone().unwrap_or_default(),
                email: email.to_string(),
                phone: self.args.phone.clone().unwrap_or_default(),
                requested_at: Utc::now(),
            },
        )?;
        ui.success("We'll reach out as soon as service reaches this address.");
        Ok(())
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        match availability::classify_raw(&self.args.address) {
            Availability::InService => {
                ui.success("Good news: this address is in the Fiberline service area.");
                if let Some(email) = self.args.email.as_deref() {
                    let id = ApplicantId::from_key(email);
                    let store = FileDraftStore::for_applicant(&id);
                    let contact = contact_from_args(&self.args);
                    WizardController::new(Box::new(store), Some(&contact))?;
                    ui.message(&format!(
                        "Your details are saved. Run `fiberline signup --applicant {}` to get connected.",
                        email
                    ));
                } else {
                    ui.message("Run `fiberline signup` to get connected.");
                }
                Ok(CommandResult::success())
            }
            Availability::FutureService => {
                ui.message("Fiber is coming to this neighborhood but is not live yet.");
                if self.args.notify {
                    self.record_notify(ui)?;
                } else {
                    ui.message("Add --notify (with --email) to be told when it arrives.");
                }
                Ok(CommandResult::success())
            }
            Availability::NoMatch => {
                ui.warning(
                    "This address is not in the current or planned service area, or it \
                     could not be read. Expected form: \"123 Main Street, Orangeburg, SC 29115\".",
                );
                Ok(CommandResult::failure(1))
            }
        }
    }
}

/// Seed contact info from check arguments, for handing into the wizard.
pub fn contact_from_args(args: &CheckArgs) -> ContactInfo {
    ContactInfo {
        name: args.name.clone().unwrap_or_default(),
        phone: args.phone.clone().unwrap_or_default(),
        email: args.email.clone().unwrap_or_default(),
        address: args.address.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn in_service_address_succeeds() {
        let cmd = CheckCommand::new(CheckArgs {
            address: "123 Main Street, Orangeburg, SC 29115".to_string(),
            ..Default::default()
        });
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        assert!(result.success);
        assert!(ui.has_success("service area"));
    }

    #[test]
    fn unknown_address_fails() {
        let cmd = CheckCommand::new(CheckArgs {
            address: "1 Nowhere Road, Elsewhere, TX 75001".to_string(),
            ..Default::default()
        });
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        assert!(!result.success);
    }

    #[test]
    fn future_service_suggests_notify() {
        let cmd = CheckCommand::new(CheckArgs {
            address: "100 Future Lane, Orangeburg, SC 29115".to_string(),
            ..Default::default()
        });
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        assert!(result.success);
        assert!(ui.has_message("--notify"));
    }

    #[test]
    fn notify_without_email_warns() {
        let cmd = CheckCommand::new(CheckArgs {
            address: "100 Future Lane, Orangeburg, SC 29115".to_string(),
            notify: true,
            ..Default::default()
        });
        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();
        assert!(!ui.warnings().is_empty());
    }

    #[test]
    fn contact_seed_copies_fields() {
        let contact = contact_from_args(&CheckArgs {
            address: "123 Main Street, Orangeburg, SC 29115".to_string(),
            name: Some("Kim Doe".to_string()),
            email: Some("kim@example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(contact.name, "Kim Doe");
        assert_eq!(contact.phone, "");
    }
}
