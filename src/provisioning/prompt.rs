//! Interactive input capability
//!
//! The workflow only talks to a [`Prompter`], so it can run against the
//! terminal or against canned answers.

use crate::{RepoInitError, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};
use std::collections::VecDeque;

/// Line-oriented user input
pub trait Prompter {
    /// Free-form line of text (may be empty)
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Hidden input for secrets
    fn secret(&mut self, prompt: &str) -> Result<String> {
        self.input(prompt)
    }

    /// Yes/no question
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Prompts on the terminal with dialoguer
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact()?)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }
}

/// Replays canned answers in order; runs out with an error
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Prompts shown so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            RepoInitError::Aborted(format!("no answer available for prompt '{}'", prompt))
        })
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let answer = self.input(prompt)?;
        Ok(match answer.trim().to_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }
}
