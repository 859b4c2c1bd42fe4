// RUNTIME PREFERENCES (User Experience)
//
// Defaults come from SUM_EVAL_* environment variables. A TOML file may override
// any subset of fields; omitted fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Errors raised while loading runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to record skipped spaces and literal widths
    pub collect_detailed_metrics: bool,

    /// Whether to emit a debug event for every token produced
    pub log_token_details: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env::var(env_vars::LEXICAL_DETAILED_METRICS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_token_details: env::var(env_vars::LEXICAL_LOG_TOKEN_DETAILS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxPreferences {
    /// Whether to emit a debug event on every parser state transition
    pub log_state_transitions: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            log_state_transitions: env::var(env_vars::SYNTAX_LOG_STATE_TRANSITIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPreferences {
    /// Whether the driver prints the token sequence before the result
    pub show_tokens: bool,

    /// Report format for each evaluated expression
    pub format: OutputFormat,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            show_tokens: env::var(env_vars::OUTPUT_SHOW_TOKENS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            format: env::var(env_vars::OUTPUT_FORMAT)
                .ok()
                .and_then(|v| parse_output_format(&v))
                .unwrap_or(OutputFormat::Text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_output_format(format: &str) -> Option<OutputFormat> {
    match format.to_lowercase().as_str() {
        "text" | "plain" => Some(OutputFormat::Text),
        "json" => Some(OutputFormat::Json),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchPreferences {
    /// Worker threads for batch evaluation (1 means sequential)
    pub max_threads: usize,

    /// Stop at the first failing expression
    pub fail_fast: bool,

    /// Print a progress line per expression
    pub progress_reporting: bool,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        Self {
            max_threads: env::var(env_vars::BATCH_MAX_THREADS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    std::thread::available_parallelism()
                        .map(|n| n.get().min(8))
                        .unwrap_or(4)
                }),
            fail_fast: env::var(env_vars::BATCH_FAIL_FAST)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            progress_reporting: env::var(env_vars::BATCH_PROGRESS_REPORTING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether log events are written to the console at all
    pub enable_console_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,

    /// Whether to include timing events
    pub log_performance_events: bool,

    /// Whether to print collected errors cargo-style after a run
    pub enable_cargo_style_output: bool,

    /// Whether to tag events with the label of the input being evaluated
    pub include_input_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env::var(env_vars::LOGGING_LOG_PERFORMANCE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            enable_cargo_style_output: env::var(env_vars::LOGGING_CARGO_STYLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            include_input_context: env::var(env_vars::LOGGING_INCLUDE_INPUT_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for the logging service
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub syntax: SyntaxPreferences,
    pub output: OutputPreferences,
    pub batch: BatchPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "SUM_EVAL_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_LOG_TOKEN_DETAILS: &str = "SUM_EVAL_LEXICAL_LOG_TOKEN_DETAILS";

    // Syntax
    pub const SYNTAX_LOG_STATE_TRANSITIONS: &str = "SUM_EVAL_SYNTAX_LOG_STATE_TRANSITIONS";

    // Output
    pub const OUTPUT_SHOW_TOKENS: &str = "SUM_EVAL_OUTPUT_SHOW_TOKENS";
    pub const OUTPUT_FORMAT: &str = "SUM_EVAL_OUTPUT_FORMAT";

    // Batch
    pub const BATCH_MAX_THREADS: &str = "SUM_EVAL_BATCH_MAX_THREADS";
    pub const BATCH_FAIL_FAST: &str = "SUM_EVAL_BATCH_FAIL_FAST";
    pub const BATCH_PROGRESS_REPORTING: &str = "SUM_EVAL_BATCH_PROGRESS_REPORTING";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "SUM_EVAL_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "SUM_EVAL_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "SUM_EVAL_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "SUM_EVAL_LOGGING_LOG_PERFORMANCE";
    pub const LOGGING_CARGO_STYLE: &str = "SUM_EVAL_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_INPUT_CONTEXT: &str = "SUM_EVAL_LOGGING_INCLUDE_INPUT_CONTEXT";
}
