//! Token stream with a forward-only cursor

use crate::{
    tokens::token::Token,
    utils::{Span, Spanned},
};

/// A token with span information
pub type SpannedToken = Spanned<Token>;

/// Ordered tokens produced by the lexer, consumed front to back by the parser.
///
/// The cursor never moves past the end; reading at the end yields `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Build a stream from bare tokens.
    ///
    /// Spans are synthesized from token indices, so diagnostics point at the
    /// token position rather than a character column.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| Spanned::new(token, Span::single(index)))
            .collect();
        Self::new(tokens)
    }

    /// Token at the cursor without advancing
    pub fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.position)
    }

    /// Return the token at the cursor and advance past it
    pub fn next_token(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.position).copied()?;
        self.position += 1;
        Some(token)
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn remaining_count(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }

    /// Rewind the cursor to the first token
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Bare token values in order
    pub fn tokens(&self) -> Vec<Token> {
        self.tokens.iter().map(|spanned| spanned.value).collect()
    }

    pub fn as_slice(&self) -> &[SpannedToken] {
        &self.tokens
    }

    /// Span just past the last token, where an end-of-input error points
    pub fn end_span(&self) -> Span {
        Span::empty_at(self.tokens.last().map(|t| t.span.end).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenStream {
        TokenStream::new(vec![
            Spanned::new(Token::Number(10), Span::new(0, 2)),
            Spanned::new(Token::Plus, Span::single(3)),
            Spanned::new(Token::Number(5), Span::single(5)),
        ])
    }

    #[test]
    fn test_next_token_advances_until_end() {
        let mut stream = sample();
        assert_eq!(stream.next_token().map(|t| t.value), Some(Token::Number(10)));
        assert_eq!(stream.peek().map(|t| t.value), Some(Token::Plus));
        assert_eq!(stream.remaining_count(), 2);

        stream.next_token();
        stream.next_token();
        assert!(stream.is_at_end());
        assert_eq!(stream.next_token(), None);
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut stream = sample();
        stream.next_token();
        stream.reset();
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_from_tokens_synthesizes_spans() {
        let stream = TokenStream::from_tokens(vec![Token::Plus, Token::Number(1)]);
        assert_eq!(stream.as_slice()[1].span, Span::single(1));
        assert_eq!(stream.tokens(), vec![Token::Plus, Token::Number(1)]);
    }

    #[test]
    fn test_end_span() {
        assert_eq!(sample().end_span(), Span::empty_at(6));
        assert_eq!(TokenStream::from_tokens(Vec::new()).end_span(), Span::empty_at(0));
    }
}
