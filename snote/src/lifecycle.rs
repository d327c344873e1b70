//! Note lifecycle: creating, updating, listing and searching notes
//!
//! Each operation is a single linear flow. Content reaches the notebook only
//! through one final write, and only when the edit changed it.

use crate::editor::Editor;
use crate::error::{ErrorContext, Result};
use crate::notebook::index::{self, NoteEntry, SearchMode, SortKey};
use crate::notebook::selector::{self, SelectionPrompt};
use crate::notebook::{Notebook, FALLBACK_TITLE, TITLE_PLACEHOLDER};
use std::path::{Path, PathBuf};

/// What an edit session did to the notebook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    /// Content was written to this path
    Saved(PathBuf),
    /// The edit left the content as it was; nothing was written
    Unchanged,
}

/// Notebook operations driven through an [`Editor`]
pub struct NoteManager<'a, E> {
    notebook: &'a Notebook,
    editor: E,
}

impl<'a, E: Editor> NoteManager<'a, E> {
    /// Manage `notebook`, editing through `editor`
    pub fn new(notebook: &'a Notebook, editor: E) -> Self {
        Self { notebook, editor }
    }

    /// The notebook being managed
    pub fn notebook(&self) -> &Notebook {
        self.notebook
    }

    /// Create a note titled `title` (or the default title) from the template.
    ///
    /// The note file is only created when the edited content differs from
    /// the seeded template.
    pub fn new_note(&self, title: Option<&str>, add_timestamp: bool) -> Result<NoteOutcome> {
        let title = self.resolve_title(title);
        let filename = self.notebook.note_filename(&title)?;
        let path = self.notebook.location().join(&filename);
        tracing::debug!("Creating note {} in {}", filename, self.notebook.name());

        let initial = self.notebook.template()?.replace(TITLE_PLACEHOLDER, &title);
        self.edit_and_save(&path, initial.as_bytes(), add_timestamp)
    }

    /// Edit the most recent note, or the note matching `filter`.
    ///
    /// The file is only rewritten when the edit changed its content.
    pub fn update_note(
        &self,
        filter: Option<&str>,
        add_timestamp: bool,
        prompt: &mut dyn SelectionPrompt,
    ) -> Result<NoteOutcome> {
        let path = self.note_path(filter, prompt)?;
        tracing::debug!("Updating note {}", path.display());

        let initial = std::fs::read(&path)
            .with_context(|| format!("Failed to read note '{}'", path.display()))?;
        self.edit_and_save(&path, &initial, add_timestamp)
    }

    /// Path of the most recently created note, or of the note matching
    /// `filter` (asking `prompt` when several match)
    pub fn note_path(
        &self,
        filter: Option<&str>,
        prompt: &mut dyn SelectionPrompt,
    ) -> Result<PathBuf> {
        let entry = match filter {
            None => index::last_note(self.notebook.location())?,
            Some(term) => {
                let candidates = index::search(self.notebook.location(), term, SearchMode::Literal)?;
                selector::resolve(term, candidates, prompt)?
            }
        };
        Ok(entry.into_path())
    }

    /// Notes newest first, truncated to `limit`.
    ///
    /// A non-positive `limit` defers to the notebook's `max_list`; a
    /// non-positive `max_list` lists everything.
    pub fn list_notes(&self, limit: i64) -> Result<Vec<NoteEntry>> {
        let mut entries = index::list(self.notebook.location(), SortKey::Created, true)?;
        if let Some(limit) = effective_limit(limit, self.notebook.max_list()) {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    /// Notes matching `term`, in name order
    pub fn search_notes(&self, term: &str, mode: SearchMode) -> Result<Vec<NoteEntry>> {
        index::search(self.notebook.location(), term, mode)
    }

    fn resolve_title(&self, title: Option<&str>) -> String {
        let usable = |t: &&str| !t.trim().is_empty();
        title
            .filter(usable)
            .or(self.notebook.default_title().filter(usable))
            .unwrap_or(FALLBACK_TITLE)
            .to_string()
    }

    fn edit_and_save(&self, path: &Path, initial: &[u8], add_timestamp: bool) -> Result<NoteOutcome> {
        let stamp = if add_timestamp {
            Some(self.notebook.timestamp()?)
        } else {
            None
        };

        let edited = self.editor.edit(initial, stamp.as_deref())?;
        if edited == initial {
            tracing::debug!("No change detected, not saving");
            return Ok(NoteOutcome::Unchanged);
        }

        std::fs::write(path, &edited)
            .with_context(|| format!("Failed to write note '{}'", path.display()))?;
        tracing::info!("Note saved to {}", path.display());
        Ok(NoteOutcome::Saved(path.to_path_buf()))
    }
}

/// Number of notes a listing shows, `None` for all
pub fn effective_limit(requested: i64, configured: i64) -> Option<usize> {
    let limit = if requested > 0 { requested } else { configured };
    usize::try_from(limit).ok().filter(|limit| *limit > 0)
}
