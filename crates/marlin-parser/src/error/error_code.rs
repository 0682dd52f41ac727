//! Error codes for the Marlin diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unexpected character.
    ///
    /// No token rule of the grammar matches at this position.
    E001,

    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but not closed on the same line.
    E002,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The token does not continue any statement of the grammar.
    E100,

    /// Unexpected end of input.
    ///
    /// The input ended before a complete statement was parsed.
    E101,

    /// Invalid value.
    ///
    /// A token has the right shape but its value cannot be converted, such
    /// as a fractional packet bit position.
    E102,

    /// Invalid range.
    ///
    /// A range ends before it starts.
    E103,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E002 => "unterminated string literal",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E102 => "invalid value",
            ErrorCode::E103 => "invalid range",
        }
    }

    /// Returns `true` for codes reported by the lexer.
    pub fn is_lexical(&self) -> bool {
        matches!(self, ErrorCode::E001 | ErrorCode::E002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E103.to_string(), "E103");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E002.description(), "unterminated string literal");
        assert_eq!(ErrorCode::E101.description(), "unexpected end of input");
    }

    #[test]
    fn test_error_code_phase() {
        assert!(ErrorCode::E001.is_lexical());
        assert!(!ErrorCode::E100.is_lexical());
    }
}
