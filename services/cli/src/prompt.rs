use std::io;

use credit_intake::intake::StepView;
use dialoguer::{Confirm, Input};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StepInput {
    Value(String),
    Back,
    Quit,
}

impl StepInput {
    pub(crate) fn parse(raw: &str) -> Self {
        match raw.trim() {
            ":back" | ":b" => Self::Back,
            ":quit" | ":q" => Self::Quit,
            _ => Self::Value(raw.to_string()),
        }
    }
}

/// Terminal interaction used by the apply loop.
pub(crate) trait Prompter {
    fn value(&mut self, view: &StepView<'_>) -> io::Result<StepInput>;
    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool>;
    fn notice(&mut self, text: &str);
}

#[derive(Debug, Default)]
pub(crate) struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn value(&mut self, view: &StepView<'_>) -> io::Result<StepInput> {
        let raw: String = Input::new()
            .with_prompt(view.label)
            .with_initial_text(view.value)
            .allow_empty(true)
            .interact_text()
            .map_err(io::Error::other)?;
        Ok(StepInput::parse(&raw))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(io::Error::other)
    }

    fn notice(&mut self, text: &str) {
        println!("{text}");
    }
}
