//! Error handling for the snote CLI
//!
//! Library errors are carried with their source chain and mapped to an exit
//! code; the chain is printed on a single `Error:` line.

use crate::exit_codes::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_SUCCESS};
use snote::{ErrorChain, SnoteError};
use std::error::Error;
use std::fmt;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type that includes both error information and suggested exit code
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    /// Create a new CLI error with a message and exit code
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Create a CLI error from another error with a specific exit code
    pub fn from_error<E: Error + Send + Sync + 'static>(error: E, exit_code: i32) -> Self {
        Self {
            message: error.to_string(),
            exit_code,
            source: Some(Box::new(error)),
        }
    }

    /// The message followed by every underlying cause, on one line
    pub fn full_chain(&self) -> String {
        match self.source() {
            // The source is the error the message was taken from.
            Some(err) => ErrorChain::new(err).to_string(),
            None => self.message.clone(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<SnoteError> for CliError {
    fn from(error: SnoteError) -> Self {
        let exit_code = if error.is_configuration_error() {
            EXIT_CONFIG_ERROR
        } else {
            EXIT_FAILURE
        };
        Self::from_error(error, exit_code)
    }
}

impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> Self {
        let message = error.to_string();
        Self {
            message,
            exit_code: EXIT_FAILURE,
            source: Some(error.into()),
        }
    }
}

/// Convert a CliResult to an exit code, printing the error chain if needed
pub fn handle_cli_result<T>(result: CliResult<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eprintln!("Error: {}", e.full_chain());
            e.exit_code
        }
    }
}
