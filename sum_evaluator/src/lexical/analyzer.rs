//! Core lexical analyzer
//!
//! Scans an expression character by character. Only ASCII digits, the ASCII
//! space and `+` are accepted; anything else stops the scan at once.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{SpannedToken, Token, TokenStream};
use crate::utils::{Span, Spanned};
use crate::{log_debug, log_error, log_success};

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character '{character}'")]
    InvalidCharacter { character: char, span: Span },

    #[error("Number literal '{literal}' exceeds the maximum value {max}", max = u64::MAX)]
    NumberOverflow { literal: String, span: Span },

    #[error("Input too long: {length} characters (max {max})", max = MAX_INPUT_LENGTH)]
    InputTooLong { length: usize },

    #[error("Too many tokens: {count} (max {max})", max = MAX_TOKEN_COUNT)]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::NumberOverflow { .. } => codes::lexical::NUMBER_OVERFLOW,
            LexerError::InputTooLong { .. } => codes::lexical::INPUT_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// Location of the offending text, if the error has one
    pub fn span(&self) -> Option<Span> {
        match self {
            LexerError::InvalidCharacter { span, .. } | LexerError::NumberOverflow { span, .. } => {
                Some(*span)
            }
            LexerError::InputTooLong { .. } | LexerError::TooManyTokens { .. } => None,
        }
    }
}

/// Per-tokenization metrics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub number_tokens: usize,
    pub operator_tokens: usize,

    // Only collected with `collect_detailed_metrics`
    pub skipped_spaces: usize,
    pub longest_literal: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &SpannedToken, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        match token.value {
            Token::Number(_) => {
                self.number_tokens += 1;
                if preferences.collect_detailed_metrics {
                    self.longest_literal = self.longest_literal.max(token.span.len());
                }
            }
            Token::Plus => self.operator_tokens += 1,
        }
    }

    pub(crate) fn record_space(&mut self, preferences: &LexicalPreferences) {
        if preferences.collect_detailed_metrics {
            self.skipped_spaces += 1;
        }
    }
}

/// Lexical analyzer over one input expression.
///
/// The cursor is an index into the input's characters. It only moves forward
/// and never passes the end.
pub struct LexicalAnalyzer {
    input: Vec<char>,
    position: usize,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new(input: &str) -> Self {
        Self::with_preferences(input, LexicalPreferences::default())
    }

    pub fn with_preferences(input: &str, preferences: LexicalPreferences) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Character at the cursor, or `None` at the end of input
    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Move the cursor forward one character. No-op at the end of input.
    pub fn advance(&mut self) {
        if self.position < self.input.len() {
            self.position += 1;
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume a maximal run of ASCII digits and return its base-10 value.
    ///
    /// Returns `Ok(0)` without moving if the cursor is not on a digit; callers
    /// check `peek()` first. A literal that does not fit in a `u64` is consumed
    /// entirely and reported as `NumberOverflow`.
    pub fn scan_number(&mut self) -> Result<u64, LexerError> {
        let start = self.position;
        let mut value: Option<u64> = Some(0);

        while let Some(digit) = self.peek().filter(char::is_ascii_digit) {
            let digit = u64::from(digit as u8 - b'0');
            value = value
                .and_then(|v| v.checked_mul(10))
                .and_then(|v| v.checked_add(digit));
            self.advance();
        }

        value.ok_or_else(|| LexerError::NumberOverflow {
            literal: self.input[start..self.position].iter().collect(),
            span: Span::new(start, self.position),
        })
    }

    /// Tokenize the whole input from the beginning.
    ///
    /// Resets the cursor and metrics, so repeated calls give the same result.
    pub fn tokenize(&mut self) -> Result<TokenStream, LexerError> {
        self.position = 0;
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "char_count" => self.input.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        match self.scan_tokens() {
            Ok(tokens) => {
                let stream = TokenStream::new(tokens);

                log_success!(codes::success::TOKENIZATION_COMPLETE,
                    "Lexical analysis completed successfully",
                    "token_count" => stream.len(),
                    "numbers" => self.metrics.number_tokens,
                    "operators" => self.metrics.operator_tokens,
                    "skipped_spaces" => self.metrics.skipped_spaces
                );

                Ok(stream)
            }
            Err(error) => {
                let message = error.to_string();
                match error.span() {
                    Some(span) => log_error!(error.error_code(), &message,
                        span = span,
                        "tokens_processed" => self.metrics.total_tokens
                    ),
                    None => log_error!(error.error_code(), &message,
                        "tokens_processed" => self.metrics.total_tokens
                    ),
                }
                Err(error)
            }
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: LexicalPreferences) {
        self.preferences = preferences;
    }

    fn scan_tokens(&mut self) -> Result<Vec<SpannedToken>, LexerError> {
        if self.input.len() > MAX_INPUT_LENGTH {
            return Err(LexerError::InputTooLong {
                length: self.input.len(),
            });
        }

        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            let start = self.position;

            let token = match ch {
                '0'..='9' => {
                    let value = self.scan_number()?;
                    Spanned::new(Token::Number(value), Span::new(start, self.position))
                }
                '+' => {
                    self.advance();
                    Spanned::new(Token::Plus, Span::single(start))
                }
                ' ' => {
                    self.advance();
                    self.metrics.record_space(&self.preferences);
                    continue;
                }
                _ => {
                    return Err(LexerError::InvalidCharacter {
                        character: ch,
                        span: Span::single(start),
                    })
                }
            };

            if self.preferences.log_token_details {
                log_debug!("Token produced",
                    "token" => format!("{:?}", token.value),
                    "span" => token.span
                );
            }

            self.metrics.record_token(&token, &self.preferences);
            tokens.push(token);

            if tokens.len() > MAX_TOKEN_COUNT {
                return Err(LexerError::TooManyTokens {
                    count: tokens.len(),
                });
            }
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn lex(input: &str) -> Result<Vec<Token>, LexerError> {
        LexicalAnalyzer::new(input).tokenize().map(|stream| stream.tokens())
    }

    #[test]
    fn test_demo_expression() {
        assert_eq!(
            lex("10 + 5 + 5").unwrap(),
            vec![
                Token::Number(10),
                Token::Plus,
                Token::Number(5),
                Token::Plus,
                Token::Number(5)
            ]
        );
    }

    #[test]
    fn test_empty_input_is_empty_sequence() {
        assert_eq!(lex("").unwrap(), Vec::<Token>::new());
        assert_eq!(lex("   ").unwrap(), Vec::<Token>::new());
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(lex("007").unwrap(), vec![Token::Number(7)]);
    }

    #[test]
    fn test_lexing_does_not_check_grammar() {
        assert_eq!(lex("3+").unwrap(), vec![Token::Number(3), Token::Plus]);
        assert_eq!(lex("3 3").unwrap(), vec![Token::Number(3), Token::Number(3)]);
        assert_eq!(lex("+5").unwrap(), vec![Token::Plus, Token::Number(5)]);
    }

    #[test]
    fn test_invalid_character_reports_first_offender() {
        assert_matches!(
            lex("5 & 3 $"),
            Err(LexerError::InvalidCharacter { character: '&', span }) if span == Span::single(2)
        );
    }

    #[test]
    fn test_only_ascii_space_is_whitespace() {
        assert_matches!(lex("1\t+ 2"), Err(LexerError::InvalidCharacter { character: '\t', .. }));
        assert_matches!(lex("1 + 2\n"), Err(LexerError::InvalidCharacter { character: '\n', .. }));
        assert_matches!(lex("-1"), Err(LexerError::InvalidCharacter { character: '-', .. }));
    }

    #[test]
    fn test_non_ascii_digits_are_rejected() {
        // Arabic-Indic digit one
        assert_matches!(
            lex("\u{0661}"),
            Err(LexerError::InvalidCharacter { character: '\u{0661}', .. })
        );
    }

    #[test]
    fn test_number_overflow() {
        assert_eq!(lex("18446744073709551615").unwrap(), vec![Token::Number(u64::MAX)]);

        let error = lex("1 + 18446744073709551616").unwrap_err();
        assert_matches!(
            &error,
            LexerError::NumberOverflow { literal, span }
                if literal == "18446744073709551616" && *span == Span::new(4, 24)
        );
        assert_eq!(error.error_code(), codes::lexical::NUMBER_OVERFLOW);
    }

    #[test]
    fn test_peek_and_advance_stop_at_end() {
        let mut analyzer = LexicalAnalyzer::new("7");
        assert_eq!(analyzer.peek(), Some('7'));
        analyzer.advance();
        assert_eq!(analyzer.peek(), None);
        analyzer.advance();
        assert_eq!(analyzer.position(), 1);
    }

    #[test]
    fn test_scan_number_without_digits_returns_zero() {
        let mut analyzer = LexicalAnalyzer::new("+1");
        assert_eq!(analyzer.scan_number(), Ok(0));
        assert_eq!(analyzer.position(), 0);
    }

    #[test]
    fn test_scan_number_stops_at_non_digit() {
        let mut analyzer = LexicalAnalyzer::new("123+4");
        assert_eq!(analyzer.scan_number(), Ok(123));
        assert_eq!(analyzer.peek(), Some('+'));
    }

    #[test]
    fn test_tokenize_is_repeatable() {
        let mut analyzer = LexicalAnalyzer::new("1 + 22 + 333");
        let first = analyzer.tokenize().unwrap();
        let second = analyzer.tokenize().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_spans_cover_literals() {
        let stream = LexicalAnalyzer::new("10 +  5").tokenize().unwrap();
        let spans: Vec<Span> = stream.as_slice().iter().map(|t| t.span).collect();
        assert_eq!(spans, vec![Span::new(0, 2), Span::single(3), Span::single(6)]);
    }

    #[test]
    fn test_metrics() {
        let mut analyzer = LexicalAnalyzer::with_preferences(
            "100 + 2",
            LexicalPreferences {
                collect_detailed_metrics: true,
                log_token_details: false,
            },
        );
        analyzer.tokenize().unwrap();

        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, 3);
        assert_eq!(metrics.number_tokens, 2);
        assert_eq!(metrics.operator_tokens, 1);
        assert_eq!(metrics.skipped_spaces, 2);
        assert_eq!(metrics.longest_literal, 3);
    }

    #[test]
    fn test_detailed_metrics_can_be_disabled() {
        let mut analyzer = LexicalAnalyzer::with_preferences(
            "100 + 2",
            LexicalPreferences {
                collect_detailed_metrics: false,
                log_token_details: true,
            },
        );
        analyzer.tokenize().unwrap();
        assert_eq!(analyzer.metrics().skipped_spaces, 0);
        assert_eq!(analyzer.metrics().longest_literal, 0);
    }

    #[test]
    fn test_input_too_long() {
        let input = "1".repeat(MAX_INPUT_LENGTH + 1);
        assert_matches!(
            lex(&input),
            Err(LexerError::InputTooLong { length }) if length == MAX_INPUT_LENGTH + 1
        );
    }
}
