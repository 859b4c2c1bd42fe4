//! Rendering of evaluation results for humans and machines

use super::{ErrorKind, PipelineError, PipelineResult};
use crate::lexical::LexerError;
use crate::syntax::SyntaxError;
use crate::tokens::Token;
use crate::utils::{SourceLine, Span};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one evaluation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Value {
        value: u64,
    },
    Error {
        code: String,
        kind: ErrorKind,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
}

/// Serializable record of one evaluation
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Token>>,
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationReport {
    pub fn from_result(input: &str, result: &Result<PipelineResult, PipelineError>) -> Self {
        let (tokens, outcome, duration_ms) = match result {
            Ok(success) => (
                Some(success.tokens.clone()),
                Outcome::Value {
                    value: success.value,
                },
                Some(success.processing_duration.as_secs_f64() * 1000.0),
            ),
            Err(error) => (
                error.tokens().map(<[Token]>::to_vec),
                Outcome::Error {
                    code: error.error_code().as_str().to_string(),
                    kind: error.kind(),
                    message: error.detail(),
                    span: error.diagnostic_span(input),
                },
                None,
            ),
        };

        Self {
            input: input.to_string(),
            line: None,
            tokens,
            outcome,
            duration_ms,
            evaluated_at: Utc::now(),
        }
    }

    /// Attach the 1-based line number the expression was read from
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Drop the token list from the report
    pub fn without_tokens(mut self) -> Self {
        self.tokens = None;
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Value { .. })
    }

    /// Single-line JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// User-facing message for a failed evaluation
pub fn describe_error(error: &PipelineError) -> String {
    match error {
        PipelineError::LexicalAnalysis(LexerError::InvalidCharacter { character, .. }) => {
            format!("The input contained an invalid character: {}", character)
        }
        PipelineError::SyntaxAnalysis {
            error: SyntaxError::UnexpectedEndOfInput,
            ..
        } => "Unexpected end of input".to_string(),
        PipelineError::SyntaxAnalysis {
            error: SyntaxError::InvalidToken { token, .. },
            ..
        } => format!("Invalid token: {:?}", token),
        other => format!("An error has occurred: {}", other),
    }
}

/// Render an evaluation as text.
///
/// Successful runs print the input, the tokens and `Result: <n>`. Failed runs
/// print the message from [`describe_error`] followed by a caret diagnostic
/// when the error has a location.
pub fn render_text(
    input: &str,
    result: &Result<PipelineResult, PipelineError>,
    show_tokens: bool,
) -> String {
    let mut out = format!("Evaluating: {}\n", input);

    match result {
        Ok(success) => {
            if show_tokens {
                out.push_str(&format!("Tokens: {:?}\n", success.tokens));
            }
            out.push_str(&format!("Result: {}\n", success.value));
        }
        Err(error) => {
            if show_tokens {
                if let Some(tokens) = error.tokens() {
                    out.push_str(&format!("Tokens: {:?}\n", tokens));
                }
            }
            out.push_str(&describe_error(error));
            out.push('\n');

            let code = error.error_code();
            match error.diagnostic_span(input) {
                Some(span) => out.push_str(&SourceLine::new(input).format_error(
                    &span,
                    code.as_str(),
                    &error.detail(),
                )),
                None => out.push_str(&format!("error[{}]: {}\n", code.as_str(), error.detail())),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::process_input;

    #[test]
    fn test_render_success() {
        let input = "10 + 5 + 5";
        let text = render_text(input, &process_input(input), true);
        assert_eq!(
            text,
            "Evaluating: 10 + 5 + 5\n\
             Tokens: [Number(10), Plus, Number(5), Plus, Number(5)]\n\
             Result: 20\n"
        );

        let quiet = render_text(input, &process_input(input), false);
        assert!(!quiet.contains("Tokens:"));
    }

    #[test]
    fn test_render_invalid_character() {
        let input = "3 & 4";
        let text = render_text(input, &process_input(input), true);
        assert!(text.contains("The input contained an invalid character: &\n"));
        assert!(text.contains("error[E020]"));
        assert!(text.contains("  --> col 3\n"));
        assert!(text.ends_with("   |   ^\n"));
        assert!(!text.contains("Tokens:"));
    }

    #[test]
    fn test_render_end_of_input_points_past_last_char() {
        let input = "3+";
        let text = render_text(input, &process_input(input), true);
        assert!(text.contains("Tokens: [Number(3), Plus]\n"));
        assert!(text.contains("Unexpected end of input\n"));
        assert!(text.contains("error[E040]"));
        assert!(text.ends_with(" 1 | 3+\n   |   ^\n"));
    }

    #[test]
    fn test_render_invalid_token_and_other() {
        let text = render_text("3 3", &process_input("3 3"), false);
        assert!(text.contains("Invalid token: Number(3)\n"));

        let text = render_text(
            "99999999999999999999",
            &process_input("99999999999999999999"),
            false,
        );
        assert!(text.contains("An error has occurred: Lexical analysis failed:"));
        assert!(text.contains("error[E022]"));
    }

    #[test]
    fn test_report_json() {
        let report = EvaluationReport::from_result("1 + 2", &process_input("1 + 2")).with_line(4);
        assert!(report.is_success());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["status"], "value");
        assert_eq!(json["value"], 3);
        assert_eq!(json["line"], 4);
        assert_eq!(json["tokens"][1], "Plus");
        assert!(json["evaluated_at"].is_string());
    }

    #[test]
    fn test_report_json_error() {
        let report =
            EvaluationReport::from_result("3 3", &process_input("3 3")).without_tokens();
        assert!(!report.is_success());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "E050");
        assert_eq!(json["kind"], "InvalidToken");
        assert_eq!(json["span"]["start"], 2);
        assert!(json.get("tokens").is_none());
    }
}
