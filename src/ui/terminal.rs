//! Interactive terminal UI.

use std::io::Write;
use std::time::Duration;

use console::{style, Style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{FiberlineError, Result};

use super::{
    NonInteractiveUI, OutputMode, Prompt, PromptKind, PromptOption, PromptResult, SpinnerHandle,
    UserInterface,
};

/// Create the appropriate UI for the current environment.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

/// Convert dialoguer errors to FiberlineError.
fn map_dialoguer_err(e: dialoguer::Error) -> FiberlineError {
    FiberlineError::Other(anyhow::Error::new(e))
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    mode: OutputMode,
    success_style: Style,
    warning_style: Style,
    error_style: Style,
    header_style: Style,
    dim_style: Style,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let colors = std::env::var_os("NO_COLOR").is_none();
        let styled = |s: Style| if colors { s } else { Style::new() };

        Self {
            term: Term::stdout(),
            mode,
            success_style: styled(Style::new().green()),
            warning_style: styled(Style::new().yellow()),
            error_style: styled(Style::new().red()),
            header_style: styled(Style::new().cyan().bold()),
            dim_style: styled(Style::new().dim()),
        }
    }

    fn shows_status(&self) -> bool {
        self.mode != OutputMode::Quiet
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.shows_status() {
            writeln!(self.term, "{} {}", self.success_style.apply_to("✔"), msg).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.shows_status() {
            writeln!(self.term, "{} {}", self.warning_style.apply_to("!"), msg).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{} {}", self.error_style.apply_to("✘"), msg).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        match &prompt.kind {
            PromptKind::Confirm => prompt_confirm(prompt, &self.term),
            PromptKind::Input => prompt_input(prompt, &self.term),
            PromptKind::Select { options } => prompt_select(prompt, options, &self.term),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.shows_status() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.shows_status() {
            writeln!(self.term, "\n{}\n", self.header_style.apply_to(title)).ok();
        }
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.shows_status() {
            writeln!(
                self.term,
                "{}",
                self.dim_style
                    .apply_to(format!("[Step {} of {}]", current, total))
            )
            .ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let default = prompt
        .default
        .as_ref()
        .map(|s| s.to_lowercase() == "true" || s == "y" || s == "yes")
        .unwrap_or(false);

    let result = Confirm::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_input(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let theme = prompt_theme();
    let input = Input::<String>::with_theme(&theme).with_prompt(&prompt.question);

    let result: String = if let Some(default) = &prompt.default {
        input
            .default(default.clone())
            .interact_on(term)
            .map_err(map_dialoguer_err)?
    } else {
        input
            .allow_empty(true)
            .interact_on(term)
            .map_err(map_dialoguer_err)?
    };

    Ok(PromptResult::String(result))
}

fn prompt_select(prompt: &Prompt, options: &[PromptOption], term: &Term) -> Result<PromptResult> {
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_idx = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0);

    let selection = Select::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(default_idx)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::String(options[selection].value.clone()))
}

/// A progress spinner for the checkout and verification calls.
pub struct ProgressSpinner {
    bar: ProgressBar,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    /// Create a spinner that doesn't show (for quiet mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar
            .finish_with_message(format!("{} {}", style("✔").green(), msg));
    }

    fn finish_error(&mut self, msg: &str) {
        self.bar
            .set_style(ProgressStyle::default_spinner().template("{msg}").unwrap());
        self.bar
            .finish_with_message(format!("{} {}", style("✘").red(), msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_ui_interactive_returns_terminal() {
        let ui = create_ui(true, OutputMode::Normal);
        assert_eq!(ui.output_mode(), OutputMode::Normal);
    }

    #[test]
    fn create_ui_non_interactive() {
        let ui = create_ui(false, OutputMode::Quiet);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn input_builder_outlives_its_theme_borrow() {
        let theme = prompt_theme();
        let input = Input::<String>::with_theme(&theme)
            .with_prompt("Install date")
            .default("2026-09-01".to_string());
        drop(input);
    }

    #[test]
    fn hidden_spinner_finishes_without_panicking() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.set_message("verifying");
        spinner.finish_success("done");
    }
}
