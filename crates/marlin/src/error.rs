//! Error types for Marlin operations.
//!
//! This module provides the main error type [`MarlinError`] which wraps
//! the error conditions of reading, parsing and laying out diagrams.

use std::io;

use thiserror::Error;

use marlin_core::text_flow::TextFlowError;
use marlin_parser::error::{DispatchError, ParseError};

/// The main error type for Marlin operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the diagnostics so that
/// their spans can be rendered in context.
#[derive(Debug, Error)]
pub enum MarlinError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error(transparent)]
    Dispatch(DispatchError),

    #[error("Layout error: {0}")]
    Layout(#[from] TextFlowError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MarlinError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Wraps a dispatch error, keeping the source of a parse failure.
    pub fn from_dispatch(err: DispatchError, src: impl Into<String>) -> Self {
        match err {
            DispatchError::Parse(err) => Self::new_parse_error(err, src),
            err => Self::Dispatch(err),
        }
    }
}
