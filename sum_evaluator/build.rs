// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    batch_processing: BatchProcessingLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_input_length: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct BatchProcessingLimits {
    max_worker_threads: usize,
    max_expressions_per_batch: usize,
    max_input_file_size: u64,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_events_per_input: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SUM_EVAL_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=SUM_EVAL_CONFIG_DIR");

    let profile = env::var("SUM_EVAL_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("SUM_EVAL_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the crate directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_INPUT_LENGTH: usize = 16 * 1024 * 1024;
    const ABSOLUTE_MAX_WORKER_THREADS: usize = 256;
    const ABSOLUTE_MAX_INPUT_FILE_SIZE: u64 = 1_000_000_000;

    if config.lexical.max_input_length == 0 || config.lexical.max_token_count == 0 {
        panic!("LIMITS: lexical limits must be non-zero");
    }

    if config.lexical.max_input_length > ABSOLUTE_MAX_INPUT_LENGTH {
        panic!("LIMITS: max_input_length exceeds absolute maximum");
    }

    if config.lexical.max_token_count > config.lexical.max_input_length {
        panic!("LIMITS: max_token_count cannot exceed max_input_length");
    }

    if config.batch_processing.max_worker_threads == 0
        || config.batch_processing.max_worker_threads > ABSOLUTE_MAX_WORKER_THREADS
    {
        panic!("LIMITS: max_worker_threads must be between 1 and 256");
    }

    if config.batch_processing.max_input_file_size > ABSOLUTE_MAX_INPUT_FILE_SIZE {
        panic!("LIMITS: max_input_file_size exceeds absolute maximum");
    }

    if config.logging.max_log_events_per_input > config.logging.log_buffer_size {
        panic!("LIMITS: max_log_events_per_input exceeds log_buffer_size");
    }

    if profile == "production" && config.lexical.max_input_length > 1024 * 1024 {
        panic!("PRODUCTION: max_input_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_INPUT_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod batch_processing {{
        pub const MAX_WORKER_THREADS: usize = {};
        pub const MAX_EXPRESSIONS_PER_BATCH: usize = {};
        pub const MAX_INPUT_FILE_SIZE: u64 = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_EVENTS_PER_INPUT: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        // Lexical
        config.lexical.max_input_length,
        config.lexical.max_token_count,
        // Batch Processing
        config.batch_processing.max_worker_threads,
        config.batch_processing.max_expressions_per_batch,
        config.batch_processing.max_input_file_size,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_events_per_input,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
