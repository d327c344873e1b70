//! snote CLI Library
//!
//! Command-line interface definitions, command handlers and exit codes for
//! the `snote` binary.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// CLI error type and exit code mapping
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Rendering note listings
pub mod list;
/// Log level selection and subscriber setup
pub mod logging;
/// Note command handlers
pub mod note;
/// Interactive note selection
pub mod prompt;
