//! Token definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A lexical token.
///
/// Numbers are unsigned 64-bit; literals that do not fit are rejected by the
/// lexer rather than wrapped. Equality is structural and ignores source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Non-negative integer literal
    Number(u64),
    /// Addition operator `+`
    Plus,
}

/// Coarse classification used for metrics and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Literal,
    Operator,
}

impl Token {
    pub fn class(&self) -> TokenClass {
        match self {
            Token::Number(_) => TokenClass::Literal,
            Token::Plus => TokenClass::Operator,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Token::Number(_))
    }

    pub fn is_operator(&self) -> bool {
        self.class() == TokenClass::Operator
    }

    /// The numeric value, if this is a literal
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Token::Number(value) => Some(*value),
            Token::Plus => None,
        }
    }

    /// Name used in log context
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Number(_) => "number",
            Token::Plus => "plus",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Plus => write!(f, "+"),
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenClass::Literal => write!(f, "literal"),
            TokenClass::Operator => write!(f, "operator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display() {
        assert_eq!(Token::Number(42).to_string(), "42");
        assert_eq!(Token::Plus.to_string(), "+");
    }

    #[test]
    fn test_token_debug_matches_driver_output() {
        let tokens = vec![Token::Number(10), Token::Plus, Token::Number(5)];
        assert_eq!(format!("{:?}", tokens), "[Number(10), Plus, Number(5)]");
    }

    #[test]
    fn test_classification() {
        assert_eq!(Token::Number(0).class(), TokenClass::Literal);
        assert!(Token::Plus.is_operator());
        assert_eq!(Token::Number(9).as_number(), Some(9));
        assert_eq!(Token::Plus.as_number(), None);
    }

    #[test]
    fn test_token_serializes_for_reports() {
        let json = serde_json::to_string(&vec![Token::Number(3), Token::Plus]).unwrap();
        assert_eq!(json, r#"[{"Number":3},"Plus"]"#);
    }
}
