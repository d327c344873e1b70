//! Asking the operator to pick one of several matching notes

use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use is_terminal::IsTerminal;
use snote::{ErrorContext, LinePrompt, NoteEntry, SelectionPrompt};
use std::io;

/// Interactive prompt for a terminal session
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionPrompt for TerminalPrompt {
    fn choose(&mut self, candidates: &[NoteEntry]) -> snote::Result<Option<String>> {
        println!("{}", "Multiple notes found".bold());
        for (idx, entry) in candidates.iter().enumerate() {
            let info = entry.info();
            println!(
                "{} {:<12}{}",
                format!("{:>5}", format!("[{}]", idx + 1)).cyan(),
                info.date,
                info.title
            );
        }

        let last = candidates.len();
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(format!("Select note (Enter for [{last}])"))
            .allow_empty(true)
            .interact_text()
            .context("Failed to read selection")?;
        Ok(Some(answer))
    }
}

/// The prompt to use for this process: interactive on a terminal, plain line
/// input otherwise
pub fn selection_prompt() -> Box<dyn SelectionPrompt> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        Box::new(TerminalPrompt::new())
    } else {
        Box::new(LinePrompt::new(io::stdin().lock(), io::stdout()))
    }
}
