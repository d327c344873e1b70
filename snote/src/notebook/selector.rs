//! Narrowing search results down to a single note
//!
//! One candidate is taken as is. Several candidates are shown to the
//! operator, who answers with a 1-based index; an empty answer picks the
//! last candidate shown.

use super::index::NoteEntry;
use crate::error::{ErrorContext, Result, SnoteError};
use std::io::{BufRead, Write};

/// Source of the operator's answer when several notes match
pub trait SelectionPrompt {
    /// Present `candidates` and return the raw answer.
    ///
    /// `None` means the operator gave no answer (end of input).
    fn choose(&mut self, candidates: &[NoteEntry]) -> Result<Option<String>>;
}

/// A parsed answer to the selection prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the candidates
    Index(usize),
    /// No answer; use the last candidate
    Default,
}

impl Selection {
    /// Interpret `input` against `count` candidates
    pub fn parse(input: Option<&str>, count: usize) -> Result<Self> {
        let input = match input.map(str::trim) {
            None | Some("") => return Ok(Self::Default),
            Some(input) => input,
        };

        let index: usize = input
            .parse()
            .map_err(|_| SnoteError::InvalidSelection(input.to_string()))?;
        if index == 0 || index > count {
            return Err(SnoteError::SelectionOutOfRange { index, count });
        }
        Ok(Self::Index(index - 1))
    }
}

/// Resolve `candidates` to one note, asking `prompt` when there is a choice.
///
/// An empty candidate list is a failed search for `term`.
pub fn resolve(
    term: &str,
    mut candidates: Vec<NoteEntry>,
    prompt: &mut dyn SelectionPrompt,
) -> Result<NoteEntry> {
    if candidates.len() <= 1 {
        return candidates
            .pop()
            .ok_or_else(|| SnoteError::NoMatch(term.to_string()));
    }

    let answer = prompt.choose(&candidates)?;
    let selected = match Selection::parse(answer.as_deref(), candidates.len())? {
        Selection::Index(index) => candidates.swap_remove(index),
        Selection::Default => candidates
            .pop()
            .ok_or_else(|| SnoteError::NoMatch(term.to_string()))?,
    };
    tracing::debug!("Selected note {}", selected.name());
    Ok(selected)
}

/// Prompt that writes an enumerated list to `output` and reads one line
/// from `input`
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Create a prompt over the given streams
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn render(&mut self, candidates: &[NoteEntry]) -> std::io::Result<()> {
        writeln!(self.output, "Multiple notes found")?;
        writeln!(self.output, "{:>5} {:<12}{:<50}", "", "Date", "Title")?;
        for (idx, entry) in candidates.iter().enumerate() {
            let info = entry.info();
            let number = format!("[{}]", idx + 1);
            writeln!(self.output, "{:>5} {:<12}{:<50}", number, info.date, info.title)?;
        }
        write!(self.output, "Select: ")?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> SelectionPrompt for LinePrompt<R, W> {
    fn choose(&mut self, candidates: &[NoteEntry]) -> Result<Option<String>> {
        self.render(candidates)
            .context("Failed to write selection prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read selection")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
