//! Syntax analysis and evaluation
//!
//! Walks a [`TokenStream`] against the grammar `Number (Plus Number)*` and
//! returns the sum of its numbers.

mod error;
mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::{create_parser, Parser, ParserState};

use crate::config::runtime::SyntaxPreferences;
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_success};

/// Evaluate a token stream with default preferences
pub fn evaluate_token_stream(token_stream: TokenStream) -> SyntaxResult<u64> {
    evaluate_token_stream_with_preferences(token_stream, SyntaxPreferences::default())
}

pub fn evaluate_token_stream_with_preferences(
    token_stream: TokenStream,
    preferences: SyntaxPreferences,
) -> SyntaxResult<u64> {
    log_debug!("Starting syntax analysis", "tokens" => token_stream.len());

    let mut parser = Parser::with_preferences(token_stream, preferences);
    let result = parser::evaluate_with_logging(&mut parser);

    if let Ok(value) = &result {
        log_success!(codes::success::EVALUATION_COMPLETE,
            "Expression evaluated successfully",
            "value" => value
        );
    }

    result
}

/// Check that every syntax code has registry metadata (run at startup)
pub fn init_syntax_logging() -> Result<(), String> {
    let syntax_codes = [
        codes::syntax::UNEXPECTED_END_OF_INPUT,
        codes::syntax::INVALID_TOKEN,
        codes::syntax::SUM_OVERFLOW,
        codes::success::EVALUATION_COMPLETE,
    ];

    for code in &syntax_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    log_success!(
        codes::success::SYNTAX_VALIDATION_PASSED,
        "Syntax code validation passed"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical;

    #[test]
    fn test_evaluate_lexed_expression() {
        let tokens = lexical::tokenize("1 + 2 + 3").unwrap();
        assert_eq!(evaluate_token_stream(tokens), Ok(6));
    }

    #[test]
    fn test_error_surfaces_from_stream() {
        let tokens = lexical::tokenize("3+").unwrap();
        assert_eq!(
            evaluate_token_stream(tokens),
            Err(SyntaxError::UnexpectedEndOfInput)
        );
    }

    #[test]
    fn test_init_validation() {
        assert!(init_syntax_logging().is_ok());
    }
}
