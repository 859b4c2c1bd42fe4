//! Batch evaluation of many expressions
//!
//! Expressions are read one per line and evaluated independently, either on
//! the calling thread or split across worker threads. Results always come back
//! in input order.

use crate::config::compile_time::batch_processing::*;
use crate::config::runtime::RuntimeConfig;
use crate::logging::{self, codes, Code};
use crate::pipeline::{self, PipelineError, PipelineResult};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub fail_fast: bool,
    pub progress_reporting: bool,
    pub max_expressions: Option<usize>,
    /// Stage preferences applied to every expression
    pub runtime: RuntimeConfig,
}

impl BatchConfig {
    pub fn from_runtime(runtime: &RuntimeConfig) -> Self {
        Self {
            max_threads: runtime.batch.max_threads.max(1),
            fail_fast: runtime.batch.fail_fast,
            progress_reporting: runtime.batch.progress_reporting,
            max_expressions: None,
            runtime: runtime.clone(),
        }
    }

    /// Worker count actually used, capped by the build limit
    pub fn effective_threads(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from_runtime(&RuntimeConfig::default())
    }
}

/// One expression and the line it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// 1-based line number
    pub line: usize,
    pub input: String,
}

impl BatchEntry {
    pub fn new(line: usize, input: impl Into<String>) -> Self {
        Self {
            line,
            input: input.into(),
        }
    }

    pub fn label(&self) -> String {
        format!("line {}", self.line)
    }
}

/// Evaluation result for one batch entry
#[derive(Debug)]
pub struct BatchOutcome {
    pub entry: BatchEntry,
    pub result: Result<PipelineResult, PipelineError>,
}

/// Batch processing results, ordered by line
#[derive(Debug)]
pub struct BatchResults {
    pub outcomes: Vec<BatchOutcome>,
    pub processing_duration: Duration,
    pub expressions_read: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            processing_duration: Duration::new(0, 0),
            expressions_read: 0,
        }
    }

    pub fn successful(&self) -> impl Iterator<Item = (&BatchEntry, &PipelineResult)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (&o.entry, r)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&BatchEntry, &PipelineError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.entry, e)))
    }

    pub fn success_count(&self) -> usize {
        self.successful().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn expressions_processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.outcomes.len() as f64
        }
    }

    pub fn add(&mut self, entry: BatchEntry, result: Result<PipelineResult, PipelineError>) {
        self.outcomes.push(BatchOutcome { entry, result });
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.outcomes.extend(other.outcomes);
        self.outcomes.sort_by_key(|o| o.entry.line);
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} expressions evaluated, {} successful ({:.1}%), {} failed, {:.2}s total",
            self.expressions_processed(),
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

impl Default for BatchResults {
    fn default() -> Self {
        Self::new()
    }
}

/// Batch processing errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Input file too large: {size} bytes (max: {max})")]
    InputTooLarge { size: u64, max: u64 },

    #[error("Too many expressions: {count} (max: {max})")]
    TooManyExpressions { count: usize, max: usize },

    #[error("No expressions found in {path}")]
    NoExpressions { path: String },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Thread pool error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::InputNotFound { .. } => codes::input::FILE_NOT_FOUND,
            Self::InputTooLarge { .. } => codes::input::FILE_TOO_LARGE,
            Self::TooManyExpressions { .. } => codes::input::TOO_MANY_EXPRESSIONS,
            Self::NoExpressions { .. } => codes::input::NO_EXPRESSIONS,
            Self::Io { .. } => codes::input::IO_ERROR,
            Self::ThreadError { .. } => codes::system::INTERNAL_ERROR,
        }
    }
}

// ============================================================================
// INPUT READING
// ============================================================================

/// Read one expression per line.
///
/// Blank lines and lines starting with `#` are skipped. A trailing `\r` is
/// stripped so CRLF files behave like LF files.
pub fn read_expressions(path: &Path) -> Result<Vec<BatchEntry>, BatchError> {
    crate::log_info!("Reading expressions", "file" => path.display());

    if !path.is_file() {
        return Err(BatchError::InputNotFound {
            path: path.display().to_string(),
        });
    }

    let io_error = |source: std::io::Error| BatchError::Io {
        path: path.display().to_string(),
        source,
    };

    let size = fs::metadata(path).map_err(io_error)?.len();
    if size > MAX_INPUT_FILE_SIZE {
        return Err(BatchError::InputTooLarge {
            size,
            max: MAX_INPUT_FILE_SIZE,
        });
    }

    let content = fs::read_to_string(path).map_err(io_error)?;
    let entries = parse_expression_lines(&content);

    if entries.is_empty() {
        return Err(BatchError::NoExpressions {
            path: path.display().to_string(),
        });
    }

    if entries.len() > MAX_EXPRESSIONS_PER_BATCH {
        return Err(BatchError::TooManyExpressions {
            count: entries.len(),
            max: MAX_EXPRESSIONS_PER_BATCH,
        });
    }

    Ok(entries)
}

fn parse_expression_lines(content: &str) -> Vec<BatchEntry> {
    content
        .split('\n')
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                None
            } else {
                Some(BatchEntry::new(index + 1, line))
            }
        })
        .collect()
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

fn evaluate_entry(entry: &BatchEntry, input_id: usize, config: &BatchConfig) -> BatchOutcome {
    let result = logging::with_input_context(entry.label(), input_id, || {
        let result = pipeline::process_input_with_config(&entry.input, &config.runtime);
        if let Err(error) = &result {
            crate::log_debug!("Expression failed",
                "line" => entry.line,
                "kind" => format!("{:?}", error.kind())
            );
        }
        result
    });

    BatchOutcome {
        entry: entry.clone(),
        result,
    }
}

/// Evaluate entries one by one on the calling thread
pub fn evaluate_sequential(entries: &[BatchEntry], config: &BatchConfig) -> BatchResults {
    let start_time = Instant::now();

    crate::log_info!("Starting sequential batch evaluation",
        "expressions" => entries.len()
    );

    let mut results = BatchResults::new();
    results.expressions_read = entries.len();

    for (input_id, entry) in entries.iter().enumerate() {
        if config.progress_reporting {
            eprintln!(
                "Evaluating expression {} of {} ({})",
                input_id + 1,
                entries.len(),
                entry.label()
            );
        }

        let outcome = evaluate_entry(entry, input_id, config);
        let failed = outcome.result.is_err();
        results.outcomes.push(outcome);

        if failed && config.fail_fast {
            crate::log_warning!("Fail-fast mode enabled, stopping batch evaluation",
                "line" => entry.line
            );
            break;
        }
    }

    results.processing_duration = start_time.elapsed();
    log_batch_complete("Sequential batch evaluation completed", &results, 1);

    results
}

/// Evaluate entries across worker threads.
///
/// Entries are processed in chunks; with fail-fast, no further chunk starts
/// once a chunk reports a failure.
pub fn evaluate_parallel(
    entries: &[BatchEntry],
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let threads = config.effective_threads();

    crate::log_info!("Starting parallel batch evaluation",
        "expressions" => entries.len(),
        "max_threads" => threads
    );

    let mut results = BatchResults::new();
    results.expressions_read = entries.len();

    if entries.is_empty() {
        return Ok(results);
    }

    let chunk_size = calculate_chunk_size(entries.len());

    crate::log_debug!("Parallel evaluation configuration",
        "total_expressions" => entries.len(),
        "chunk_size" => chunk_size,
        "threads" => threads
    );

    for (chunk_index, chunk) in entries.chunks(chunk_size).enumerate() {
        let chunk_results = evaluate_chunk_parallel(chunk, chunk_index * chunk_size, threads, config)?;
        let chunk_failed = chunk_results.failure_count() > 0;
        results.merge(chunk_results);

        if config.fail_fast && chunk_failed {
            crate::log_warning!("Fail-fast mode enabled, stopping batch evaluation");
            break;
        }
    }

    results.processing_duration = start_time.elapsed();
    log_batch_complete("Parallel batch evaluation completed", &results, threads);

    Ok(results)
}

/// Evaluate one chunk, splitting it into contiguous slices per worker
fn evaluate_chunk_parallel(
    chunk: &[BatchEntry],
    first_id: usize,
    threads: usize,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let per_thread = (chunk.len() + threads - 1) / threads;
    let mut handles = Vec::new();

    for (slice_index, slice) in chunk.chunks(per_thread).enumerate() {
        let thread_entries = slice.to_vec();
        let thread_config = config.clone();
        let start_id = first_id + slice_index * per_thread;

        let handle = thread::Builder::new()
            .name(format!("sum-eval-{}", slice_index))
            .spawn(move || {
                thread_entries
                    .iter()
                    .enumerate()
                    .map(|(offset, entry)| evaluate_entry(entry, start_id + offset, &thread_config))
                    .collect::<Vec<_>>()
            })
            .map_err(|e| BatchError::ThreadError {
                message: format!("Failed to spawn worker: {}", e),
            })?;

        handles.push((slice, handle));
    }

    let mut results = BatchResults::new();
    for (slice, handle) in handles {
        match handle.join() {
            Ok(outcomes) => results.outcomes.extend(outcomes),
            Err(_) => {
                crate::log_error!(
                    codes::system::INTERNAL_ERROR,
                    "Worker thread panicked",
                    "expressions" => slice.len()
                );
                for entry in slice {
                    results.add(
                        entry.clone(),
                        Err(PipelineError::pipeline_error("worker thread panicked")),
                    );
                }
            }
        }
    }

    results.outcomes.sort_by_key(|o| o.entry.line);
    Ok(results)
}

/// Expressions per chunk; bounds how much work runs past a fail-fast failure
fn calculate_chunk_size(total: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 1;
    const MAX_CHUNK_SIZE: usize = 256;

    total.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

fn log_batch_complete(message: &str, results: &BatchResults, threads: usize) {
    crate::log_success!(
        codes::success::BATCH_PROCESSING_COMPLETE,
        message,
        "expressions_processed" => results.expressions_processed(),
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "threads_used" => threads,
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Evaluate a list of expressions, choosing the mode from `config`
pub fn process_expressions(
    mut entries: Vec<BatchEntry>,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if let Some(max) = config.max_expressions {
        if entries.len() > max {
            crate::log_warning!("Reached maximum expression limit",
                "expressions" => entries.len(),
                "limit" => max
            );
            entries.truncate(max);
        }
    }

    if config.effective_threads() == 1 || entries.len() == 1 {
        Ok(evaluate_sequential(&entries, config))
    } else {
        evaluate_parallel(&entries, config)
    }
}

/// Read and evaluate an expression file
pub fn process_file(path: &Path, config: &BatchConfig) -> Result<BatchResults, BatchError> {
    let entries = read_expressions(path)?;
    process_expressions(entries, config)
}
