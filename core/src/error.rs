//! Registration diagnostics.
//!
//! None of these abort a builder chain: the offending registration is
//! dropped, a warning is logged, and the error is kept on the builder for
//! inspection.

use thiserror::Error;

/// Why a command registration was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Command name is the empty string.
    #[error("command name must be a non-empty string, command won't be executed")]
    EmptyCommandName,
}
