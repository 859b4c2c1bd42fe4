//! Parser and evaluator for `Number (Plus Number)*`
//!
//! The sum is accumulated while walking the tokens, so no tree is built.

use crate::config::runtime::SyntaxPreferences;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{SpannedToken, Token, TokenStream};
use crate::utils::{Span, Spanned};
use crate::{log_debug, log_error};

/// What the parser accepts next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    ExpectNumber,
    ExpectOperatorOrEnd,
}

pub struct Parser {
    tokens: TokenStream,
    last_span: Option<Span>,
    preferences: SyntaxPreferences,
}

impl Parser {
    pub fn new(tokens: TokenStream) -> Self {
        Self::with_preferences(tokens, SyntaxPreferences::default())
    }

    pub fn with_preferences(tokens: TokenStream, preferences: SyntaxPreferences) -> Self {
        log_debug!("Creating parser", "tokens" => tokens.len());

        Self {
            tokens,
            last_span: None,
            preferences,
        }
    }

    /// Take the next token and advance past it. `None` once all are consumed.
    ///
    /// This is the only method that moves the parser forward.
    pub fn next_token(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.next_token()?;
        self.last_span = Some(token.span);
        Some(token)
    }

    /// Consume one token and require it to be a number
    pub fn expect_number(&mut self) -> SyntaxResult<u64> {
        match self.next_token() {
            None => Err(SyntaxError::UnexpectedEndOfInput),
            Some(Spanned {
                value: Token::Number(value),
                ..
            }) => Ok(value),
            Some(Spanned { value, span }) => Err(SyntaxError::invalid_token(value, span)),
        }
    }

    /// Evaluate the remaining tokens as a sum.
    ///
    /// Consumes the tokens; a second call starts where the first stopped.
    pub fn evaluate(&mut self) -> SyntaxResult<u64> {
        let mut state = ParserState::ExpectNumber;
        let mut sum: u64 = 0;

        loop {
            match state {
                ParserState::ExpectNumber => {
                    let operand = self.expect_number()?;
                    sum = sum.checked_add(operand).ok_or(SyntaxError::SumOverflow {
                        accumulated: sum,
                        operand,
                        span: self.last_span.unwrap_or_default(),
                    })?;
                    state = self.transition(state, ParserState::ExpectOperatorOrEnd);
                }
                ParserState::ExpectOperatorOrEnd => match self.next_token() {
                    None => return Ok(sum),
                    Some(Spanned {
                        value: Token::Plus, ..
                    }) => {
                        state = self.transition(state, ParserState::ExpectNumber);
                    }
                    Some(Spanned {
                        value: token @ Token::Number(_),
                        span,
                    }) => return Err(SyntaxError::invalid_token(token, span)),
                },
            }
        }
    }

    /// Span of the most recently consumed token
    pub fn last_span(&self) -> Option<Span> {
        self.last_span
    }

    /// Span an end-of-input error points at
    pub fn end_span(&self) -> Span {
        self.tokens.end_span()
    }

    pub fn position(&self) -> usize {
        self.tokens.position()
    }

    fn transition(&self, from: ParserState, to: ParserState) -> ParserState {
        if self.preferences.log_state_transitions {
            log_debug!("Parser state transition",
                "from" => format!("{:?}", from),
                "to" => format!("{:?}", to),
                "position" => self.tokens.position()
            );
        }
        to
    }
}

/// Create a parser with default preferences
pub fn create_parser(tokens: TokenStream) -> Parser {
    Parser::new(tokens)
}

/// Evaluate a token stream, logging failures with their span
pub(crate) fn evaluate_with_logging(parser: &mut Parser) -> SyntaxResult<u64> {
    let result = parser.evaluate();

    if let Err(error) = &result {
        let span = error.span().unwrap_or_else(|| parser.end_span());
        log_error!(error.error_code(), &error.to_string(),
            span = span,
            "tokens_consumed" => parser.position()
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn eval(tokens: Vec<Token>) -> SyntaxResult<u64> {
        Parser::new(TokenStream::from_tokens(tokens)).evaluate()
    }

    #[test]
    fn test_single_number() {
        assert_eq!(eval(vec![Token::Number(42)]), Ok(42));
    }

    #[test]
    fn test_sum() {
        assert_eq!(
            eval(vec![
                Token::Number(10),
                Token::Plus,
                Token::Number(5),
                Token::Plus,
                Token::Number(5)
            ]),
            Ok(20)
        );
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(eval(vec![]), Err(SyntaxError::UnexpectedEndOfInput));
    }

    #[test]
    fn test_trailing_plus() {
        assert_eq!(
            eval(vec![Token::Number(3), Token::Plus]),
            Err(SyntaxError::UnexpectedEndOfInput)
        );
    }

    #[test]
    fn test_adjacent_numbers_report_second() {
        assert_matches!(
            eval(vec![Token::Number(3), Token::Number(4)]),
            Err(SyntaxError::InvalidToken { token: Token::Number(4), span }) if span == Span::single(1)
        );
    }

    #[test]
    fn test_leading_plus() {
        assert_matches!(
            eval(vec![Token::Plus, Token::Number(5)]),
            Err(SyntaxError::InvalidToken { token: Token::Plus, .. })
        );
    }

    #[test]
    fn test_double_plus() {
        assert_matches!(
            eval(vec![Token::Number(1), Token::Plus, Token::Plus, Token::Number(2)]),
            Err(SyntaxError::InvalidToken { token: Token::Plus, span }) if span == Span::single(2)
        );
    }

    #[test]
    fn test_sum_overflow() {
        assert_matches!(
            eval(vec![Token::Number(u64::MAX), Token::Plus, Token::Number(1)]),
            Err(SyntaxError::SumOverflow { accumulated: u64::MAX, operand: 1, .. })
        );
        assert_eq!(
            eval(vec![Token::Number(u64::MAX - 1), Token::Plus, Token::Number(1)]),
            Ok(u64::MAX)
        );
    }

    #[test]
    fn test_next_token_stops_at_end() {
        let mut parser = Parser::new(TokenStream::from_tokens(vec![Token::Number(1)]));
        assert_eq!(parser.next_token().map(|t| t.value), Some(Token::Number(1)));
        assert_eq!(parser.last_span(), Some(Span::single(0)));
        assert_eq!(parser.next_token(), None);
        assert_eq!(parser.position(), 1);
    }

    #[test]
    fn test_expect_number() {
        let mut parser =
            Parser::new(TokenStream::from_tokens(vec![Token::Number(8), Token::Plus]));
        assert_eq!(parser.expect_number(), Ok(8));
        assert_matches!(parser.expect_number(), Err(SyntaxError::InvalidToken { token: Token::Plus, .. }));
        assert_eq!(parser.expect_number(), Err(SyntaxError::UnexpectedEndOfInput));
    }

    #[test]
    fn test_state_transition_logging_does_not_change_result() {
        let preferences = SyntaxPreferences {
            log_state_transitions: true,
        };
        let mut parser = Parser::with_preferences(
            TokenStream::from_tokens(vec![Token::Number(2), Token::Plus, Token::Number(2)]),
            preferences,
        );
        assert_eq!(evaluate_with_logging(&mut parser), Ok(4));
    }
}
