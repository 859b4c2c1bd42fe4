use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::syntax::SyntaxError;
use crate::tokens::Token;
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    /// Parsing failed; carries the tokens that lexing produced
    #[error("Syntax analysis failed: {error}")]
    SyntaxAnalysis {
        #[source]
        error: SyntaxError,
        tokens: Vec<Token>,
    },

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

/// Broad classification of a failed evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidCharacter,
    UnexpectedEndOfInput,
    InvalidToken,
    NumberOverflow,
    LimitExceeded,
    Other,
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn syntax(error: SyntaxError, tokens: Vec<Token>) -> Self {
        Self::SyntaxAnalysis { error, tokens }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LexicalAnalysis(error) => match error {
                LexerError::InvalidCharacter { .. } => ErrorKind::InvalidCharacter,
                LexerError::NumberOverflow { .. } => ErrorKind::NumberOverflow,
                LexerError::InputTooLong { .. } | LexerError::TooManyTokens { .. } => {
                    ErrorKind::LimitExceeded
                }
            },
            Self::SyntaxAnalysis { error, .. } => match error {
                SyntaxError::UnexpectedEndOfInput => ErrorKind::UnexpectedEndOfInput,
                SyntaxError::InvalidToken { .. } => ErrorKind::InvalidToken,
                SyntaxError::SumOverflow { .. } => ErrorKind::NumberOverflow,
            },
            Self::Pipeline { .. } => ErrorKind::Other,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::LexicalAnalysis(error) => error.error_code(),
            Self::SyntaxAnalysis { error, .. } => error.error_code(),
            Self::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// Message of the underlying stage error, without the stage prefix
    pub fn detail(&self) -> String {
        match self {
            Self::LexicalAnalysis(error) => error.to_string(),
            Self::SyntaxAnalysis { error, .. } => error.to_string(),
            Self::Pipeline { message } => message.clone(),
        }
    }

    /// Tokens produced before the failure, if lexing succeeded
    pub fn tokens(&self) -> Option<&[Token]> {
        match self {
            Self::SyntaxAnalysis { tokens, .. } => Some(tokens),
            _ => None,
        }
    }

    /// Where a diagnostic for `input` should point.
    ///
    /// End-of-input errors point just past the last character. Limit and
    /// internal errors have no location.
    pub fn diagnostic_span(&self, input: &str) -> Option<Span> {
        match self {
            Self::LexicalAnalysis(error) => error.span(),
            Self::SyntaxAnalysis { error, .. } => error
                .span()
                .or_else(|| Some(Span::empty_at(input.chars().count()))),
            Self::Pipeline { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let invalid = PipelineError::from(LexerError::InvalidCharacter {
            character: '&',
            span: Span::single(2),
        });
        assert_eq!(invalid.kind(), ErrorKind::InvalidCharacter);
        assert_eq!(invalid.error_code().as_str(), "E020");
        assert!(invalid.tokens().is_none());

        let eoi = PipelineError::syntax(SyntaxError::UnexpectedEndOfInput, vec![Token::Number(3)]);
        assert_eq!(eoi.kind(), ErrorKind::UnexpectedEndOfInput);
        assert_eq!(eoi.tokens(), Some(&[Token::Number(3)][..]));

        let limit = PipelineError::from(LexerError::TooManyTokens { count: 10 });
        assert_eq!(limit.kind(), ErrorKind::LimitExceeded);

        let other = PipelineError::pipeline_error("worker panicked");
        assert_eq!(other.kind(), ErrorKind::Other);
        assert_eq!(other.error_code().as_str(), "ERR001");
    }

    #[test]
    fn test_diagnostic_span_for_end_of_input() {
        let error = PipelineError::syntax(
            SyntaxError::UnexpectedEndOfInput,
            vec![Token::Number(3), Token::Plus],
        );
        assert_eq!(error.diagnostic_span("3+"), Some(Span::empty_at(2)));
        assert!(PipelineError::from(LexerError::InputTooLong { length: 5 })
            .diagnostic_span("x")
            .is_none());
    }

    #[test]
    fn test_display_and_detail() {
        let error = PipelineError::syntax(
            SyntaxError::invalid_token(Token::Number(3), Span::single(2)),
            vec![Token::Number(3), Token::Number(3)],
        );
        assert_eq!(error.to_string(), "Syntax analysis failed: Invalid token: Number(3)");
        assert_eq!(error.detail(), "Invalid token: Number(3)");
    }
}
