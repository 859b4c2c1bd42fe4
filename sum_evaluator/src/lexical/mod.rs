//! Lexical analysis
//!
//! Converts expression text into a [`TokenStream`]. Lexing never checks the
//! grammar: `"3 3"` and `"+"` both lex fine and are rejected by the parser.

pub mod analyzer;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{Token, TokenStream};

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};

/// Tokenize an expression with default preferences
pub fn tokenize(input: &str) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new(input).tokenize()
}

pub fn tokenize_with_preferences(
    input: &str,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::with_preferences(input, preferences).tokenize()
}

pub fn create_analyzer(input: &str) -> LexicalAnalyzer {
    LexicalAnalyzer::new(input)
}

/// Token totals by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCounts {
    pub total: usize,
    pub numbers: usize,
    pub operators: usize,
}

pub fn get_token_counts(stream: &TokenStream) -> TokenCounts {
    stream
        .as_slice()
        .iter()
        .fold(TokenCounts::default(), |mut counts, token| {
            counts.total += 1;
            match token.value {
                Token::Number(_) => counts.numbers += 1,
                Token::Plus => counts.operators += 1,
            }
            counts
        })
}

/// Check that every lexical code has registry metadata (run at startup)
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::INVALID_CHARACTER,
        codes::lexical::NUMBER_OVERFLOW,
        codes::lexical::INPUT_TOO_LONG,
        codes::lexical::TOO_MANY_TOKENS,
        codes::success::TOKENIZATION_COMPLETE,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical limits initialized",
        "max_input_length" => MAX_INPUT_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT
    );

    Ok(())
}
