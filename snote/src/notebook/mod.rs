//! Notebooks: named, configured directories holding flat note files
//!
//! A [`Notebook`] is resolved once per invocation from the [`Config`] and is
//! immutable afterwards. The submodules operate on its directory:
//! [`index`] lists and searches entries, [`selector`] narrows candidates to a
//! single note.

pub mod index;
pub mod selector;

use crate::config::Config;
use crate::error::{ErrorContext, Result, SnoteError};
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub use index::{NoteEntry, NoteInfo, SearchMode, SortKey};
pub use selector::{LinePrompt, Selection, SelectionPrompt};

/// Placeholder in the timestamp template replaced by the formatted time
pub const TIME_PLACEHOLDER: &str = "{time}";

/// Placeholder in note templates replaced by the note title
pub const TITLE_PLACEHOLDER: &str = "%TITLE%";

/// Title used when neither the caller nor the configuration supplies one
pub const FALLBACK_TITLE: &str = "untitled";

/// Resolved settings for one notebook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    name: String,
    location: PathBuf,
    editor: String,
    ext: String,
    datefmt: String,
    timefmt: String,
    timestamp: String,
    template: Option<PathBuf>,
    default_title: Option<String>,
    max_list: i64,
}

impl Notebook {
    /// Create a notebook with built-in settings rooted at `location`.
    ///
    /// No validation is performed; use [`Notebook::resolve`] for configured
    /// notebooks.
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            editor: "vim".to_string(),
            ext: "md".to_string(),
            datefmt: "%Y-%m-%d".to_string(),
            timefmt: "%H:%M:%S".to_string(),
            timestamp: format!("\n{TIME_PLACEHOLDER}"),
            template: None,
            default_title: Some(FALLBACK_TITLE.to_string()),
            max_list: -1,
        }
    }

    /// Resolve the notebook called `name` from the configuration.
    ///
    /// Fails when the notebook has no section, when its `path` is not an
    /// existing directory, or when a setting cannot be used.
    pub fn resolve(config: &Config, name: &str) -> Result<Self> {
        if !config.has_notebook(name) {
            return Err(SnoteError::UnknownNotebook(name.to_string()));
        }
        tracing::debug!("Notebook {} exists", name);

        let location = config
            .get_explicit(name, "path")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| SnoteError::InvalidNotebookPath(PathBuf::new()))?;
        if !location.is_dir() {
            return Err(SnoteError::InvalidNotebookPath(location));
        }
        tracing::debug!("Configured notebook path {} exists", location.display());

        let setting = |key: &str| config.get(name, key).unwrap_or_default().to_string();

        let editor = setting("editor");
        if editor.trim().is_empty() {
            return Err(SnoteError::invalid_value(name, "editor", "no editor configured"));
        }

        let datefmt = setting("datefmt");
        validate_strftime(name, "datefmt", &datefmt)?;
        let timefmt = setting("timefmt");
        validate_strftime(name, "timefmt", &timefmt)?;

        let max_list = config
            .get_non_blank(name, "max_list")
            .unwrap_or_default()
            .to_string();
        let max_list = max_list.trim().parse::<i64>().map_err(|e| {
            SnoteError::invalid_value(name, "max_list", format!("'{max_list}' is not a number: {e}"))
        })?;

        let non_empty = |value: String| Some(value).filter(|v| !v.trim().is_empty());

        Ok(Self {
            name: name.to_string(),
            location,
            editor,
            ext: setting("ext").trim_start_matches('.').to_string(),
            datefmt,
            timefmt,
            timestamp: setting("timestamp"),
            template: non_empty(setting("template")).map(PathBuf::from),
            default_title: non_empty(setting("default_title")),
            max_list,
        })
    }

    /// Set the editor command
    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = editor.into();
        self
    }

    /// Set the note file extension (without a leading dot)
    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = ext.into();
        self
    }

    /// Set the strftime format used for note dates
    pub fn with_datefmt(mut self, datefmt: impl Into<String>) -> Self {
        self.datefmt = datefmt.into();
        self
    }

    /// Set the strftime format used for timestamps
    pub fn with_timefmt(mut self, timefmt: impl Into<String>) -> Self {
        self.timefmt = timefmt.into();
        self
    }

    /// Set the timestamp template; `{time}` is replaced by the formatted time
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Set the template file seeding new notes
    pub fn with_template(mut self, template: Option<PathBuf>) -> Self {
        self.template = template;
        self
    }

    /// Set the title used when a new note is not given one
    pub fn with_default_title(mut self, title: Option<String>) -> Self {
        self.default_title = title;
        self
    }

    /// Set how many notes `list` shows by default; non-positive is unbounded
    pub fn with_max_list(mut self, max_list: i64) -> Self {
        self.max_list = max_list;
        self
    }

    /// Notebook name as configured
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding the notes
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Editor command
    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// Note file extension, without the dot
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Template file, if one is configured
    pub fn template_path(&self) -> Option<&Path> {
        self.template.as_deref()
    }

    /// Configured default title
    pub fn default_title(&self) -> Option<&str> {
        self.default_title.as_deref()
    }

    /// Default number of notes listed; non-positive means all
    pub fn max_list(&self) -> i64 {
        self.max_list
    }

    /// Content seeding new notes: the template file's text, or empty
    pub fn template(&self) -> Result<String> {
        match &self.template {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read template '{}'", path.display())),
            None => Ok(String::new()),
        }
    }

    /// Today's date rendered with the notebook's date format
    pub fn date(&self) -> Result<String> {
        render_now(&self.name, "datefmt", &self.datefmt)
    }

    /// The current time rendered with the time format and substituted into
    /// the timestamp template
    pub fn timestamp(&self) -> Result<String> {
        let time = render_now(&self.name, "timefmt", &self.timefmt)?;
        Ok(self.timestamp.replace(TIME_PLACEHOLDER, &time))
    }

    /// File name for a note created today with `title`:
    /// `{date}-{title-with-hyphens}.{ext}`. Path separators in the title
    /// become hyphens so the note always lands in the notebook directory.
    pub fn note_filename(&self, title: &str) -> Result<String> {
        let slug = title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .replace(std::path::is_separator, "-");
        let mut filename = format!("{}-{}", self.date()?, slug);
        if !self.ext.is_empty() {
            filename.push('.');
            filename.push_str(&self.ext);
        }
        Ok(filename)
    }
}

fn validate_strftime(notebook: &str, key: &str, format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(SnoteError::invalid_value(
            notebook,
            key,
            format!("'{format}' is not a valid date/time format"),
        ));
    }
    Ok(())
}

fn render_now(notebook: &str, key: &str, format: &str) -> Result<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", Local::now().format(format)).map_err(|_| {
        SnoteError::invalid_value(notebook, key, format!("cannot render '{format}'"))
    })?;
    Ok(rendered)
}
