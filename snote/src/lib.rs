//! # snote
//!
//! Notebook management for plain note files.
//!
//! A notebook is a configured directory of notes named
//! `YYYY-MM-DD-title-with-hyphens.ext`. Notes are written and edited through
//! an external editor on a scratch file, and written back to the notebook
//! only when the edit changed something.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snote::{Config, ExternalEditor, NoteManager, NoteOutcome, Notebook};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let notebook = Notebook::resolve(&config, "journal")?;
//! let manager = NoteManager::new(&notebook, ExternalEditor::for_notebook(&notebook));
//!
//! if let NoteOutcome::Saved(path) = manager.new_note(Some("first post"), false)? {
//!     println!("saved {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Configuration file loading and lookup
pub mod config;

/// External editor sessions
pub mod editor;

/// Error types
pub mod error;

/// Creating, updating, listing and searching notes
pub mod lifecycle;

/// Notebook settings, directory index and note selection
pub mod notebook;

pub use config::Config;
pub use editor::{Editor, ExternalEditor};
pub use error::{ErrorChain, ErrorContext, Result, SnoteError};
pub use lifecycle::{NoteManager, NoteOutcome};
pub use notebook::{
    LinePrompt, NoteEntry, NoteInfo, Notebook, SearchMode, Selection, SelectionPrompt, SortKey,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Config, Editor, ExternalEditor, NoteEntry, NoteManager, NoteOutcome, Notebook, Result,
        SearchMode, SelectionPrompt, SnoteError,
    };
}
