//! Operator prompting used by the interactive commands.

use dialoguer::{theme::ColorfulTheme, Confirm, Input};

/// Answer to a single field prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Value(String),
    /// Keep the current value.
    Keep,
    /// Go to the previous field or stage.
    Back,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirm,
    Back,
    Cancel,
}

pub trait Prompter {
    fn prompt_field(&mut self, label: &str, current: &str, error: Option<&str>) -> PromptResponse;

    /// Shows the collected values and asks whether to save them.
    fn confirm(&mut self, summary: &str) -> Confirmation;

    fn confirm_action(&mut self, question: &str) -> bool;

    fn show_stage(&mut self, _title: &str, _step: usize, _total: usize) {}
}

pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn prompt_field(&mut self, label: &str, current: &str, error: Option<&str>) -> PromptResponse {
        if let Some(error) = error {
            eprintln!("  ! {error}");
        }
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true);
        if !current.is_empty() {
            input = input.with_initial_text(current);
        }
        let response = match input.interact_text() {
            Ok(value) => value,
            Err(_) => return PromptResponse::Cancel,
        };
        match response.trim().to_ascii_lowercase().as_str() {
            ":back" => PromptResponse::Back,
            ":cancel" => PromptResponse::Cancel,
            _ if response == current => PromptResponse::Keep,
            _ => PromptResponse::Value(response),
        }
    }

    fn confirm(&mut self, summary: &str) -> Confirmation {
        println!("{summary}");
        loop {
            let response = match Input::<String>::with_theme(&self.theme)
                .with_prompt("Save? (yes/no/back)")
                .allow_empty(true)
                .interact_text()
            {
                Ok(value) => value,
                Err(_) => return Confirmation::Cancel,
            };
            match response.trim().to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Confirmation::Confirm,
                "n" | "no" | "cancel" => return Confirmation::Cancel,
                "b" | "back" => return Confirmation::Back,
                _ => eprintln!("Enter yes, no or back."),
            }
        }
    }

    fn confirm_action(&mut self, question: &str) -> bool {
        Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn show_stage(&mut self, title: &str, step: usize, total: usize) {
        println!("\nStep {step} of {total}: {title}  (type :back or :cancel)");
    }
}

/// Used when stdin is not a terminal. Field prompts cancel and
/// confirmations decline.
pub struct NoInput;

impl Prompter for NoInput {
    fn prompt_field(&mut self, _label: &str, _current: &str, _error: Option<&str>) -> PromptResponse {
        PromptResponse::Cancel
    }

    fn confirm(&mut self, _summary: &str) -> Confirmation {
        Confirmation::Cancel
    }

    fn confirm_action(&mut self, _question: &str) -> bool {
        false
    }
}
