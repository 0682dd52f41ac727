//! Error and diagnostic system for the Marlin parser.
//!
//! Malformed input never aborts a parse. The lexer and each grammar record
//! [`Diagnostic`]s as they go; a failed parse hands them back together as a
//! [`ParseError`], lexer diagnostics first.
//!
//! # Example
//!
//! ```
//! # use marlin_parser::error::{Diagnostic, ErrorCode};
//! # use marlin_parser::Span;
//!
//! let diag = Diagnostic::error("unexpected token `,`: expected number")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(12..13), "unexpected token")
//!     .with_help("each section needs a numeric value");
//! assert_eq!(diag.to_string(), "error[E100]: unexpected token `,`: expected number");
//! ```

mod collector;
mod diagnostic;
mod dispatch_error;
mod error_code;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::{Diagnostic, Label};
pub use dispatch_error::DispatchError;
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
