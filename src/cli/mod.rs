//! CLI support for jsonql
//!
//! Provides programmatic access to the `jsonql` commands so the binary stays
//! a thin argument-parsing shell.

mod check;

pub use check::{CheckOptions, CheckResult, Mode, execute_check};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Syntax error: {0}")]
    Parse(#[from] crate::ParseError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    #[error("{0}")]
    Decode(#[from] crate::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}

impl From<crate::QueryError> for CliError {
    fn from(e: crate::QueryError) -> Self {
        match e {
            crate::QueryError::Syntax(e) => CliError::Parse(e),
            crate::QueryError::Eval(e) => CliError::Eval(e),
        }
    }
}
