//! Syntax errors with code registry integration

use crate::logging::{codes, Code};
use crate::tokens::Token;
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// A number was required but the tokens ran out
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    /// A token appeared where the grammar does not allow it
    #[error("Invalid token: {token:?}")]
    InvalidToken { token: Token, span: Span },

    #[error("Sum overflow: {accumulated} + {operand} exceeds the maximum value {max}", max = u64::MAX)]
    SumOverflow {
        accumulated: u64,
        operand: u64,
        span: Span,
    },
}

impl SyntaxError {
    pub fn invalid_token(token: Token, span: Span) -> Self {
        Self::InvalidToken { token, span }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedEndOfInput => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::InvalidToken { .. } => codes::syntax::INVALID_TOKEN,
            Self::SumOverflow { .. } => codes::syntax::SUM_OVERFLOW,
        }
    }

    /// Span of the offending token. End-of-input errors have none; callers
    /// point them just past the input.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::InvalidToken { span, .. } | Self::SumOverflow { span, .. } => Some(*span),
            Self::UnexpectedEndOfInput => None,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SyntaxError::UnexpectedEndOfInput.error_code().as_str(), "E040");
        assert_eq!(
            SyntaxError::invalid_token(Token::Plus, Span::single(0)).error_code().as_str(),
            "E050"
        );
    }

    #[test]
    fn test_display_uses_token_debug() {
        let error = SyntaxError::invalid_token(Token::Number(3), Span::single(2));
        assert_eq!(error.to_string(), "Invalid token: Number(3)");
        assert_eq!(error.span(), Some(Span::single(2)));
    }

    #[test]
    fn test_registry_metadata() {
        let error = SyntaxError::UnexpectedEndOfInput;
        assert_eq!(error.category(), "Syntax");
        assert_eq!(error.severity(), "High");
        assert_eq!(error.description(), "Unexpected end of input");
        assert!(error.span().is_none());
        assert!(!error.recommended_action().is_empty());
    }
}
