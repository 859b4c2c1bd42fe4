//! Token system for sum expressions
//!
//! The lexer turns input text into a [`TokenStream`] of [`Token`]s, each paired
//! with the character span it was read from. The parser consumes the stream
//! front to back.
//!
//! ## Token Types
//!
//! - `Number(u64)` - a base-10 literal of ASCII digits
//! - `Plus` - the `+` operator
//!
//! Spaces separate tokens but never appear in the stream.

pub mod token;
pub mod token_stream;

pub use token::{Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream};

// Re-export span types from utils
pub use crate::utils::{Span, Spanned};
