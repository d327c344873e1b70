//! Editing content through an external editor
//!
//! [`ExternalEditor`] writes the content to a scratch file, runs the
//! configured editor on it and blocks until the editor exits, then reads the
//! file back. The scratch file is removed when the session ends, whatever the
//! outcome.

use crate::error::{ErrorContext, Result, SnoteError};
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Prefix of scratch file names
pub const SCRATCH_PREFIX: &str = "snote_";

/// An edit round-trip over a byte buffer
pub trait Editor {
    /// Let the operator edit `initial`, with `stamp` appended when given,
    /// and return the resulting bytes.
    fn edit(&self, initial: &[u8], stamp: Option<&str>) -> Result<Vec<u8>>;
}

/// Runs a configured editor executable on a temporary file
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    command: String,
    extension: String,
}

impl ExternalEditor {
    /// Editor running `command`; scratch files get `.{extension}`
    pub fn new(command: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            extension: extension.into(),
        }
    }

    /// Editor configured for `notebook`
    pub fn for_notebook(notebook: &crate::notebook::Notebook) -> Self {
        Self::new(notebook.editor(), notebook.ext())
    }

    /// The command this editor runs
    pub fn command(&self) -> &str {
        &self.command
    }

    fn launch_error(&self, source: impl std::error::Error + Send + Sync + 'static) -> SnoteError {
        SnoteError::EditorLaunch {
            editor: self.command.clone(),
            source: Box::new(source),
        }
    }

    fn run(&self, file: &Path) -> Result<ExitStatus> {
        let program = which::which(&self.command).map_err(|e| self.launch_error(e))?;
        tracing::debug!("Launching {} on {}", program.display(), file.display());

        let mut child = Command::new(&program)
            .arg(file)
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        let _interrupts = InterruptGuard::install();
        child
            .wait()
            .with_context(|| format!("Failed waiting for editor '{}'", self.command))
    }
}

impl Editor for ExternalEditor {
    fn edit(&self, initial: &[u8], stamp: Option<&str>) -> Result<Vec<u8>> {
        let suffix = if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        };

        let mut scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(&suffix)
            .tempfile()
            .context("Failed to create scratch file")?;
        scratch
            .write_all(initial)
            .context("Failed to write scratch file")?;
        if let Some(stamp) = stamp {
            scratch
                .write_all(stamp.as_bytes())
                .context("Failed to write timestamp")?;
        }
        scratch.flush().context("Failed to write scratch file")?;

        // Close our handle; the path is still removed on drop.
        let scratch = scratch.into_temp_path();

        let status = self.run(&scratch)?;
        tracing::debug!("Editor exited with {}", status);

        std::fs::read(&scratch)
            .with_context(|| format!("Failed to read back '{}'", scratch.display()))
    }
}

/// Ignores terminal interrupts in this process while the editor owns the
/// terminal, restoring the previous handlers on drop.
#[cfg(unix)]
struct InterruptGuard {
    previous: Vec<(nix::sys::signal::Signal, nix::sys::signal::SigHandler)>,
}

#[cfg(unix)]
impl InterruptGuard {
    fn install() -> Self {
        use nix::sys::signal::{signal, SigHandler, Signal};

        let mut previous = Vec::new();
        for sig in [Signal::SIGINT, Signal::SIGQUIT] {
            // SAFETY: SigIgn runs no code in the handler.
            match unsafe { signal(sig, SigHandler::SigIgn) } {
                Ok(handler) => previous.push((sig, handler)),
                Err(e) => tracing::debug!("Could not ignore {}: {}", sig, e),
            }
        }
        Self { previous }
    }
}

#[cfg(unix)]
impl Drop for InterruptGuard {
    fn drop(&mut self) {
        for (sig, handler) in self.previous.drain(..) {
            // SAFETY: restores the disposition that was installed before.
            if let Err(e) = unsafe { nix::sys::signal::signal(sig, handler) } {
                tracing::debug!("Could not restore {}: {}", sig, e);
            }
        }
    }
}

#[cfg(not(unix))]
struct InterruptGuard;

#[cfg(not(unix))]
impl InterruptGuard {
    fn install() -> Self {
        Self
    }
}
