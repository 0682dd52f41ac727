//! Marlin Core Types and Text Flow
//!
//! This crate provides the foundational pieces shared by the Marlin parser and
//! its renderers:
//!
//! - **Kinds**: The closed set of supported diagram grammars ([`kind::DiagramKind`])
//! - **Text flow**: Grapheme-safe line and word fitting for labels ([`text_flow`] module)

pub mod kind;
pub mod text_flow;
