//! Unified error handling for the snote library
//!
//! Every failure a notebook operation can hit is a variant of [`SnoteError`].
//! None of them are retried: the caller reports the message and exits.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the snote library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnoteError {
    /// No configuration file could be located
    #[error("Configuration file not found: {tried}")]
    ConfigurationMissing {
        /// Human-readable description of the locations that were checked
        tried: String,
    },

    /// The configuration file is not valid INI
    #[error("Invalid configuration at line {line}: {message}")]
    ConfigParse {
        /// 1-based line number of the offending line
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// A configuration key has a value that cannot be used
    #[error("Invalid value for '{key}' in notebook '{notebook}': {reason}")]
    InvalidValue {
        /// Notebook whose settings were being resolved
        notebook: String,
        /// Configuration key
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The requested notebook has no configuration section
    #[error("Notebook '{0}' unknown")]
    UnknownNotebook(String),

    /// The configured notebook directory does not exist
    #[error("Notebook path '{}' does not exist", .0.display())]
    InvalidNotebookPath(PathBuf),

    /// A directory listing was requested on something that is not a directory
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// A search matched no notes
    #[error("No note matching '{0}' found")]
    NoMatch(String),

    /// A search term could not be compiled as a pattern
    #[error("Invalid search pattern '{pattern}'")]
    InvalidPattern {
        /// The term as supplied
        pattern: String,
        /// Compilation failure
        #[source]
        source: regex::Error,
    },

    /// The operator picked an index outside the presented list
    #[error("Invalid selection {index}: choose a number between 1 and {count}")]
    SelectionOutOfRange {
        /// Index as entered (1-based)
        index: usize,
        /// Number of candidates presented
        count: usize,
    },

    /// The operator entered something that is not a number
    #[error("Invalid selection '{0}': expected a number")]
    InvalidSelection(String),

    /// The most recent note was requested from a notebook with no notes
    #[error("Notebook '{}' contains no notes", .0.display())]
    EmptyNotebook(PathBuf),

    /// The configured editor could not be started
    #[error("Failed to launch editor '{editor}'")]
    EditorLaunch {
        /// Editor command from the configuration
        editor: String,
        /// Underlying failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generic error with context
    #[error("{message}")]
    Context {
        /// Description of the operation that failed
        message: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SnoteError {
    /// True for failures caused by the configuration rather than by the notes
    /// themselves. The CLI maps these to a distinct exit code.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMissing { .. }
                | Self::ConfigParse { .. }
                | Self::InvalidValue { .. }
                | Self::UnknownNotebook(_)
                | Self::InvalidNotebookPath(_)
        )
    }

    pub(crate) fn invalid_value(
        notebook: &str,
        key: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            notebook: notebook.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for snote operations
pub type Result<T> = std::result::Result<T, SnoteError>;

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, msg: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<S: Into<String>>(self, msg: S) -> Result<T> {
        self.map_err(|e| SnoteError::Context {
            message: msg.into(),
            source: Box::new(e),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| SnoteError::Context {
            message: f().into(),
            source: Box::new(e),
        })
    }
}

/// Formats an error followed by every underlying cause on one line,
/// separated by `": "`
pub struct ErrorChain<'a>(&'a dyn std::error::Error);

impl<'a> ErrorChain<'a> {
    /// Chain starting at `error`
    pub fn new(error: &'a dyn std::error::Error) -> Self {
        Self(error)
    }
}

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;

        let mut current = self.0.source();
        while let Some(err) = current {
            write!(f, ": {}", err)?;
            current = err.source();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_context() {
        let err: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        let err_with_context = err.context("Failed to read template");

        let msg = err_with_context.unwrap_err().to_string();
        assert!(msg.contains("Failed to read template"));
    }

    #[test]
    fn test_error_chain_is_single_line() {
        let err = SnoteError::Context {
            message: "Failed to read note".to_string(),
            source: Box::new(io::Error::new(io::ErrorKind::NotFound, "file not found")),
        };

        let chain = ErrorChain::new(&err).to_string();
        assert_eq!(chain, "Failed to read note: file not found");
        assert!(!chain.contains('\n'));
    }

    #[test]
    fn test_configuration_errors_are_classified() {
        assert!(SnoteError::UnknownNotebook("dne".into()).is_configuration_error());
        assert!(SnoteError::InvalidNotebookPath(PathBuf::from("/nope")).is_configuration_error());
        assert!(!SnoteError::NoMatch("term".into()).is_configuration_error());
        assert!(!SnoteError::EmptyNotebook(PathBuf::from("/nb")).is_configuration_error());
    }

    #[test]
    fn test_unknown_notebook_message_names_notebook() {
        let msg = SnoteError::UnknownNotebook("journal".into()).to_string();
        assert_eq!(msg, "Notebook 'journal' unknown");
    }
}
