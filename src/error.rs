//! Error taxonomy and exit-code mapping.
//!
//! All four failure kinds are terminal for the current invocation and map
//! to the distinguished exit code [`USAGE_EXIT_CODE`], so callers can tell
//! a bad invocation apart from a failing script. A child process that did
//! start owns the exit code from then on.

use std::path::PathBuf;

use thiserror::Error;

use crate::matcher::ArgumentError;
use crate::parser::DirectiveError;

/// Exit code for any runner-side failure, distinct from child exit codes.
pub const USAGE_EXIT_CODE: i32 = 2;

/// A terminal runner-side failure.
#[derive(Debug, Error)]
pub enum RunError {
    /// The script's source could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A malformed or duplicate directive.
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    /// The invocation did not match the script's Specification.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// The child process could not be created. Reported distinctly from any
    /// failure occurring inside the child.
    #[error("cannot start {program}: {message}")]
    Spawn { program: String, message: String },
}

impl RunError {
    /// The process exit code this failure maps to.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        USAGE_EXIT_CODE
    }
}
