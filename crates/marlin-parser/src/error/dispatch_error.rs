use thiserror::Error;

use crate::error::ParseError;

/// Failure of a parse requested by diagram tag.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The tag does not name a registered grammar.
    #[error("unknown diagram kind: `{0}`")]
    UnknownKind(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
