//! Exit code constants for the snote CLI
//!
//! - 0: Success
//! - 1: The requested note operation failed
//! - 2: Configuration errors (missing file, unknown notebook, bad values)
//!
//! Usage errors reported by clap also exit with 2.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// A note operation failed
pub const EXIT_FAILURE: i32 = 1;

/// The configuration could not be used
pub const EXIT_CONFIG_ERROR: i32 = 2;
