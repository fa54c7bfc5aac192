//! The sign-up wizard command.

use crate::auth::{AuthProvider, EnvAuthProvider};
use crate::cli::args::SignupArgs;
use crate::config::AppConfig;
use crate::payment::PaymentBridge;
use crate::storage::{ApplicantId, FileDraftStore};
use crate::ui::UserInterface;
use crate::wizard::{FlowOutcome, SignupFlow, WizardController};

use super::dispatcher::{Command, CommandResult};

/// The signup command implementation.
pub struct SignupCommand {
    config: AppConfig,
    args: SignupArgs,
}

impl SignupCommand {
    /// Create a new signup command.
    pub fn new(config: &AppConfig, args: SignupArgs) -> Self {
        Self {
            config: config.clone(),
            args,
        }
    }

    fn applicant_id(&self, auth: &EnvAuthProvider) -> ApplicantId {
        if let Some(key) = self.args.applicant.as_deref() {
            return ApplicantId::from_key(key);
        }
        match auth.session() {
            Some(session) => ApplicantId::from_key(&session.email),
            None => ApplicantId::anonymous(),
        }
    }
}

impl Command for SignupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        let auth = EnvAuthProvider::new();
        let id = self.applicant_id(&auth);
        let mut store = FileDraftStore::for_applicant(&id);
        if self.args.fresh {
            store.clear_all()?;
            ui.message("Discarded saved progress; starting over.");
        }

        let controller = WizardController::new(Box::new(store), None)?;
        let bridge = PaymentBridge::new(&self.config);
        let mut flow = SignupFlow::new(controller, bridge, &auth, ui);

        if let Some(url) = self.args.return_url.as_deref() {
            flow.absorb_return(url)?;
        }

        match flow.run()? {
            FlowOutcome::Completed => Ok(CommandResult::success()),
            FlowOutcome::AwaitingPayment { .. } => Ok(CommandResult::success()),
            FlowOutcome::Aborted => Ok(CommandResult::failure(1)),
        }
    }
}
