//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses, including queued responses for prompts
//! that repeat (the contracts stage loops until its gate passes).

use std::collections::{HashMap, VecDeque};

use crate::error::Result;

use super::{OutputMode, Prompt, PromptKind, PromptResult, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    progress: Vec<(usize, usize)>,
    spinners: Vec<String>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            interactive: true,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key, returned in order.
    ///
    /// After the queue is exhausted, falls back to `set_response` values,
    /// then the prompt default.
    pub fn queue_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all captured progress updates.
    pub fn progress(&self) -> &[(usize, usize)] {
        &self.progress
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    fn resolve(&mut self, prompt: &Prompt) -> Option<String> {
        if let Some(queue) = self.prompt_queues.get_mut(&prompt.key) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }
        if let Some(response) = self.prompt_responses.get(&prompt.key) {
            return Some(response.clone());
        }
        prompt.default.clone()
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        let answer = self.resolve(prompt);
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
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::default())
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        self.progress.push((current, total));
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that captures its finish message.
#[derive(Debug, Default)]
pub struct MockSpinner {
    messages: Vec<String>,
    finish_message: Option<String>,
}

impl MockSpinner {
    /// Get the final finish message.
    pub fn finish_message(&self) -> Option<&str> {
        self.finish_message.as_deref()
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::PromptOption;

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();

        ui.message("Hello");
        ui.success("Done");
        ui.warning("Careful");
        ui.error("Oops");

        assert_eq!(ui.messages(), &["Hello"]);
        assert_eq!(ui.successes(), &["Done"]);
        assert_eq!(ui.warnings(), &["Careful"]);
        assert_eq!(ui.errors(), &["Oops"]);
    }

    #[test]
    fn prompt_with_response() {
        let mut ui = MockUI::new();
        ui.set_response("email", "kim@example.com");

        let result = ui.prompt(&Prompt::input("email", "Email?")).unwrap();
        assert_eq!(result.as_string(), "kim@example.com");
        assert_eq!(ui.prompts_shown(), &["email"]);
    }

    #[test]
    fn prompt_falls_back_to_default() {
        let mut ui = MockUI::new();

        let result = ui
            .prompt(&Prompt::input("city", "City?").with_default("Orangeburg"))
            .unwrap();
        assert_eq!(result.as_string(), "Orangeburg");
    }

    #[test]
    fn confirm_parses_yes_variants() {
        let mut ui = MockUI::new();
        ui.set_response("ack", "yes");

        let result = ui.prompt(&Prompt::confirm("ack", "Agree?")).unwrap();
        assert_eq!(result.as_bool(), Some(true));
    }

    #[test]
    fn confirm_without_response_is_false() {
        let mut ui = MockUI::new();
        let result = ui.prompt(&Prompt::confirm("ack", "Agree?")).unwrap();
        assert_eq!(result.as_bool(), Some(false));
    }

    #[test]
    fn queued_responses_returned_in_order() {
        let mut ui = MockUI::new();
        ui.queue_responses("contracts-action", vec!["sign-property-access", "continue"]);

        let prompt = Prompt::select(
            "contracts-action",
            "Next?",
            vec![
                PromptOption::new("Sign property access", "sign-property-access"),
                PromptOption::new("Continue", "continue"),
            ],
        );

        assert_eq!(
            ui.prompt(&prompt).unwrap().as_string(),
            "sign-property-access"
        );
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "continue");
    }

    #[test]
    fn queue_exhaustion_falls_back_to_set_response() {
        let mut ui = MockUI::new();
        ui.set_response("key", "fallback");
        ui.queue_responses("key", vec!["first"]);

        let prompt = Prompt::input("key", "?");
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "first");
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "fallback");
    }

    #[test]
    fn captures_progress_and_headers() {
        let mut ui = MockUI::new();

        ui.show_header("Fiberline Sign-Up");
        ui.show_progress(2, 7);

        assert_eq!(ui.headers(), &["Fiberline Sign-Up"]);
        assert_eq!(ui.progress(), &[(2, 7)]);
    }

    #[test]
    fn captures_spinners() {
        let mut ui = MockUI::new();
        let _handle = ui.start_spinner("Verifying payment");
        assert_eq!(ui.spinners(), &["Verifying payment"]);
    }

    #[test]
    fn has_helpers() {
        let mut ui = MockUI::new();
        ui.message("Checking availability");
        ui.error("Payment was canceled");

        assert!(ui.has_message("availability"));
        assert!(ui.has_error("canceled"));
        assert!(!ui.has_success("anything"));
    }
}
