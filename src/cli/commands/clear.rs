//! Saved-progress removal.

use crate::cli::args::ClearArgs;
use crate::storage::FileDraftStore;
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::status::applicant_for;

/// The clear command implementation.
pub struct ClearCommand {
    args: ClearArgs,
}

impl ClearCommand {
    /// Create a new clear command.
    pub fn new(args: ClearArgs) -> Self {
        Self { args }
    }
}

impl Command for ClearCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        let id = applicant_for(self.args.applicant.as_deref());
        let mut store = FileDraftStore::for_applicant(&id);

        if !store.dir().exists() {
            ui.message("Nothing to clear.");
            return Ok(CommandResult::success());
        }

        if !self.args.yes {
            let confirmed = ui
                .prompt(&Prompt::confirm(
                    "clear-confirm",
                    "Discard all saved sign-up progress?",
                ))?
                .as_bool()
                .unwrap_or(false);
            if !confirmed {
                ui.message("Keeping saved progress.");
                return Ok(CommandResult::success());
            }
        }

        store.clear_all()?;
        ui.success("Saved progress discarded.");
        Ok(CommandResult::success())
    }
}
