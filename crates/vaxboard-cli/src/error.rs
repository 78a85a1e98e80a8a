//! CLI error types.

use thiserror::Error;

/// Errors that stop a command before it produces output.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] vaxboard_core::Error),

    /// One or more loads failed; whatever loaded was still printed.
    #[error("{failed} of {total} load(s) failed")]
    PartialLoad { failed: usize, total: usize },
}
