use crate::lexical::LexicalMetrics;
use crate::tokens::Token;
use std::time::Duration;

/// Successful evaluation of one expression
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub input: String,
    pub tokens: Vec<Token>,
    pub value: u64,
    pub lexical_metrics: LexicalMetrics,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        input: String,
        tokens: Vec<Token>,
        value: u64,
        lexical_metrics: LexicalMetrics,
        processing_duration: Duration,
    ) -> Self {
        Self {
            input,
            token_count: tokens.len(),
            tokens,
            value,
            lexical_metrics,
            processing_duration,
        }
    }

    pub fn log_success(&self) {
        crate::log_performance!(
            crate::logging::codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "Expression pipeline succeeded",
            duration = self.processing_duration,
            "value" => self.value,
            "token_count" => self.token_count,
            "numbers" => self.lexical_metrics.number_tokens
        );
    }
}
