use crate::config::build_info;
use crate::config::compile_time::{batch_processing, lexical};

/// Information about pipeline capabilities
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub pipeline_stages: usize,
    pub operators: Vec<char>,
    pub number_width_bits: u32,
    pub max_input_length: usize,
    pub max_token_count: usize,
    pub max_worker_threads: usize,
    pub max_expressions_per_batch: usize,
    pub build_profile: &'static str,
    pub global_logging_enabled: bool,
    pub cargo_style_output: bool,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        let operators: Vec<String> = self.operators.iter().map(|c| format!("'{}'", c)).collect();
        format!(
            "Sum Evaluation Pipeline:\n\
             - Pipeline Stages: {}\n\
             - Operators: {}\n\
             - Number Width: {} bits\n\
             - Max Input Length: {} chars\n\
             - Max Token Count: {}\n\
             - Max Worker Threads: {}\n\
             - Max Expressions Per Batch: {}\n\
             - Build Profile: {}\n\
             - Global Logging: {}\n\
             - Cargo-style Output: {}",
            self.pipeline_stages,
            operators.join(", "),
            self.number_width_bits,
            self.max_input_length,
            self.max_token_count,
            self.max_worker_threads,
            self.max_expressions_per_batch,
            self.build_profile,
            self.global_logging_enabled,
            self.cargo_style_output
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage evaluator for unsigned {}-bit sums ({} profile)",
            self.pipeline_stages, self.number_width_bits, self.build_profile
        )
    }
}

/// Get pipeline capabilities information
pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        pipeline_stages: 2,
        operators: vec!['+'],
        number_width_bits: u64::BITS,
        max_input_length: lexical::MAX_INPUT_LENGTH,
        max_token_count: lexical::MAX_TOKEN_COUNT,
        max_worker_threads: batch_processing::MAX_WORKER_THREADS,
        max_expressions_per_batch: batch_processing::MAX_EXPRESSIONS_PER_BATCH,
        build_profile: build_info::profile(),
        global_logging_enabled: crate::logging::is_initialized(),
        cargo_style_output: crate::logging::config::use_cargo_style_output(),
    }
}
