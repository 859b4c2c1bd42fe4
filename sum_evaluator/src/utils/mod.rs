//! Shared utilities for the lexer and parser

pub mod span;

pub use span::{SourceLine, Span, Spanned};
