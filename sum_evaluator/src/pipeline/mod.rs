//! Expression evaluation pipeline: lexing, then parsing and summing

mod error;
mod info;
pub mod output;
mod result;
mod validation;

pub use error::{ErrorKind, PipelineError};
pub use info::{get_pipeline_info, PipelineInfo};
pub use output::{render_text, EvaluationReport, Outcome};
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::runtime::{LexicalPreferences, RuntimeConfig, SyntaxPreferences};
use crate::lexical::LexicalAnalyzer;
use crate::log_info;
use crate::syntax;
use std::time::Instant;

/// Evaluate an expression and return only its value
pub fn evaluate(input: &str) -> Result<u64, PipelineError> {
    process_input(input).map(|result| result.value)
}

/// Run the full pipeline with default preferences
pub fn process_input(input: &str) -> Result<PipelineResult, PipelineError> {
    run_stages(input, LexicalPreferences::default(), SyntaxPreferences::default())
}

/// Run the full pipeline with the stage preferences from `config`
pub fn process_input_with_config(
    input: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    run_stages(input, config.lexical.clone(), config.syntax.clone())
}

fn run_stages(
    input: &str,
    lexical_preferences: LexicalPreferences,
    syntax_preferences: SyntaxPreferences,
) -> Result<PipelineResult, PipelineError> {
    let start = Instant::now();
    log_info!("Starting expression pipeline", "chars" => input.chars().count());

    // Stage 1: lexical analysis
    let mut analyzer = LexicalAnalyzer::with_preferences(input, lexical_preferences);
    let token_stream = analyzer.tokenize()?;
    let tokens = token_stream.tokens();

    // Stage 2: syntax analysis and evaluation
    let value = syntax::evaluate_token_stream_with_preferences(token_stream, syntax_preferences)
        .map_err(|error| PipelineError::syntax(error, tokens.clone()))?;

    let result = PipelineResult::new(
        input.to_string(),
        tokens,
        value,
        analyzer.metrics().clone(),
        start.elapsed(),
    );
    result.log_success();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexerError;
    use crate::syntax::SyntaxError;
    use crate::tokens::Token;
    use crate::utils::Span;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_pipeline() {
        let _ = crate::logging::init_global_logging();
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_default_expression() {
        assert_eq!(evaluate("10 + 5 + 5").unwrap(), 20);
    }

    #[test]
    fn test_accepted_expressions() {
        assert_eq!(evaluate("7").unwrap(), 7);
        assert_eq!(evaluate("1+2+3").unwrap(), 6);
        assert_eq!(evaluate("  42  ").unwrap(), 42);
        assert_eq!(evaluate("007 + 3").unwrap(), 10);
    }

    #[test]
    fn test_process_input_details() {
        let result = process_input("10 + 5 + 5").unwrap();
        assert_eq!(result.value, 20);
        assert_eq!(result.token_count, 5);
        assert_eq!(
            result.tokens,
            vec![
                Token::Number(10),
                Token::Plus,
                Token::Number(5),
                Token::Plus,
                Token::Number(5)
            ]
        );
        assert_eq!(result.lexical_metrics.number_tokens, 3);
        assert_eq!(result.input, "10 + 5 + 5");
    }

    #[test]
    fn test_invalid_character_fails_lexing() {
        assert_matches!(
            evaluate("3 & 4"),
            Err(PipelineError::LexicalAnalysis(LexerError::InvalidCharacter {
                character: '&',
                ..
            }))
        );
        assert_matches!(
            evaluate("-1"),
            Err(PipelineError::LexicalAnalysis(LexerError::InvalidCharacter { character: '-', .. }))
        );
    }

    #[test]
    fn test_grammar_failures_keep_tokens() {
        let error = evaluate("3+").unwrap_err();
        assert_matches!(
            &error,
            PipelineError::SyntaxAnalysis {
                error: SyntaxError::UnexpectedEndOfInput,
                ..
            }
        );
        assert_eq!(error.tokens(), Some(&[Token::Number(3), Token::Plus][..]));

        assert_matches!(
            evaluate(""),
            Err(PipelineError::SyntaxAnalysis {
                error: SyntaxError::UnexpectedEndOfInput,
                ..
            })
        );
        assert_matches!(
            evaluate("3 3"),
            Err(PipelineError::SyntaxAnalysis {
                error: SyntaxError::InvalidToken { token: Token::Number(3), span },
                ..
            }) if span == Span::single(2)
        );
        assert_matches!(
            evaluate("+"),
            Err(PipelineError::SyntaxAnalysis {
                error: SyntaxError::InvalidToken { token: Token::Plus, .. },
                ..
            })
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_matches!(
            evaluate("99999999999999999999"),
            Err(PipelineError::LexicalAnalysis(LexerError::NumberOverflow { .. }))
        );
        let max = u64::MAX.to_string();
        assert_matches!(
            evaluate(&format!("{} + 1", max)),
            Err(PipelineError::SyntaxAnalysis {
                error: SyntaxError::SumOverflow { .. },
                ..
            })
        );
    }

    #[test]
    fn test_process_with_config() {
        let config = RuntimeConfig::from_toml_str(
            "[syntax]\nlog_state_transitions = true\n[lexical]\ncollect_detailed_metrics = false\n",
        )
        .unwrap();
        let result = process_input_with_config("1 + 2", &config).unwrap();
        assert_eq!(result.value, 3);
        assert_eq!(result.lexical_metrics.skipped_spaces, 0);
    }
}
