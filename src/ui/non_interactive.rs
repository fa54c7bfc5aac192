//! Non-interactive UI for scripted/headless environments.

use std::collections::HashMap;

use crate::error::Result;

use super::{OutputMode, Prompt, PromptKind, PromptResult, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Prompts resolve from `FIBERLINE_PROMPT_<KEY>` environment variables, then
/// from the prompt's default. There is no terminal interaction, so a prompt
/// with neither an override nor a default resolves to an empty/negative
/// answer and the surrounding gate simply refuses to advance.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("FIBERLINE_PROMPT_"))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn override_for(&self, key: &str) -> Option<&String> {
        let env_key = format!("FIBERLINE_PROMPT_{}", key.to_uppercase().replace('-', "_"));
        self.env_overrides.get(&env_key)
    }

    fn shows_status(&self) -> bool {
        self.mode != OutputMode::Quiet
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.shows_status() {
            println!("OK: {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.shows_status() {
            println!("WARN: {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("ERROR: {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let answer = self
            .override_for(&prompt.key)
            .cloned()
            .or_else(|| prompt.default.clone());

        match &prompt.kind {
            PromptKind::Confirm => {
                let value = answer
                    .map(|a| matches!(a.as_str(), "true" | "yes" | "y" | "1"))
                    .unwrap_or(false);
                Ok(PromptResult::Bool(value))
            }
            PromptKind::Input | PromptKind::Select { .. } => {
                Ok(PromptResult::String(answer.unwrap_or_default()))
            }
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.shows_status() {
            println!("... {}", message);
        }
        Box::new(PlainSpinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.shows_status() {
            println!("== {} ==", title);
        }
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.shows_status() {
            println!("[Step {} of {}]", current, total);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints the terminal states as plain lines.
struct PlainSpinner;

impl SpinnerHandle for PlainSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("OK: {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("ERROR: {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_uses_env_override() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "FIBERLINE_PROMPT_INSTALL_TYPE".to_string(),
            "contract".to_string(),
        );
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, overrides);

        let result = ui
            .prompt(&Prompt::input("install-type", "Install type?"))
            .unwrap();
        assert_eq!(result.as_string(), "contract");
    }

    #[test]
    fn prompt_falls_back_to_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());

        let result = ui
            .prompt(&Prompt::input("slot", "Time slot?").with_default("8:00 AM - 12:00 PM"))
            .unwrap();
        assert_eq!(result.as_string(), "8:00 AM - 12:00 PM");
    }

    #[test]
    fn confirm_without_answer_is_negative() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());

        let result = ui
            .prompt(&Prompt::confirm("ack", "Acknowledge terms?"))
            .unwrap();
        assert_eq!(result.as_bool(), Some(false));
    }

    #[test]
    fn override_key_normalizes_dashes() {
        let mut overrides = HashMap::new();
        overrides.insert("FIBERLINE_PROMPT_SIGN_MODE".to_string(), "typed".to_string());
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, overrides);

        let result = ui.prompt(&Prompt::input("sign-mode", "Mode?")).unwrap();
        assert_eq!(result.as_string(), "typed");
    }

    #[test]
    fn never_interactive() {
        let ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        assert!(!ui.is_interactive());
    }
}
