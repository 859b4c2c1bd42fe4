use std::env;
use std::path::{Path, PathBuf};
use sum_evaluator::config::runtime::{LogLevel, OutputFormat, RuntimeConfig};
use sum_evaluator::pipeline::{self, EvaluationReport, PipelineError, PipelineResult};
use sum_evaluator::{batch, logging};

/// Input evaluated when no expression is given
const DEMO_EXPRESSION: &str = "10 + 5 + 5";

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    expressions: Vec<String>,
    file: Option<PathBuf>,
    json: bool,
    no_tokens: bool,
    config: Option<PathBuf>,
    verbose: bool,
    threads: Option<usize>,
    sequential: bool,
    fail_fast: bool,
    quiet: bool,
    diagnostics: bool,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let options = match parse_cli_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Run with --help for usage");
            std::process::exit(2);
        }
    };

    if options.help {
        print_help();
        return Ok(());
    }

    let runtime = load_runtime_config(&options)?;

    // Logging preferences must be in place before the logger is built
    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()?;

    if options.diagnostics {
        println!("{}", pipeline::get_pipeline_info().report());
        println!();
        print!("{}", logging::get_system_diagnostics());
        return Ok(());
    }

    let all_succeeded = match &options.file {
        Some(path) => run_batch(path, &options, &runtime),
        None => run_expressions(&options, &runtime),
    };

    if logging::config::use_cargo_style_output() {
        logging::print_cargo_style_summary();
    }

    if !all_succeeded {
        std::process::exit(1);
    }

    Ok(())
}

fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut positional_only = false;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();

        if positional_only || !arg.starts_with("--") {
            options.expressions.push(args[i].clone());
            i += 1;
            continue;
        }

        match arg {
            "--" => positional_only = true,
            "--help" => options.help = true,
            "--json" => options.json = true,
            "--no-tokens" => options.no_tokens = true,
            "--verbose" => options.verbose = true,
            "--sequential" => options.sequential = true,
            "--fail-fast" => options.fail_fast = true,
            "--quiet" => options.quiet = true,
            "--diagnostics" => options.diagnostics = true,
            "--file" | "--config" | "--threads" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{} requires a value", arg))?;
                i += 1;

                match arg {
                    "--file" => options.file = Some(PathBuf::from(value)),
                    "--config" => options.config = Some(PathBuf::from(value)),
                    _ => {
                        let threads = value
                            .parse::<usize>()
                            .map_err(|_| format!("Invalid thread count '{}'", value))?;
                        if threads == 0 {
                            return Err("--threads must be at least 1".to_string());
                        }
                        options.threads = Some(threads);
                    }
                }
            }
            _ => return Err(format!("Unknown option '{}'", arg)),
        }
        i += 1;
    }

    if options.file.is_some() && !options.expressions.is_empty() {
        return Err("--file cannot be combined with expression arguments".to_string());
    }

    Ok(options)
}

/// Load preferences from `--config` (or defaults and environment) and apply CLI overrides
fn load_runtime_config(options: &CliOptions) -> Result<RuntimeConfig, Box<dyn std::error::Error>> {
    let mut runtime = match &options.config {
        Some(path) => RuntimeConfig::from_toml_file(path).map_err(|e| {
            logging::safe_log_error(logging::codes::input::CONFIG_ERROR, &e.to_string());
            e
        })?,
        None => RuntimeConfig::default(),
    };

    if options.verbose {
        runtime.logging.enable_console_logging = true;
        runtime.logging.min_log_level = LogLevel::Debug;
    }
    if options.json {
        runtime.output.format = OutputFormat::Json;
    }
    if options.no_tokens {
        runtime.output.show_tokens = false;
    }
    if let Some(threads) = options.threads {
        runtime.batch.max_threads = threads;
    }
    if options.sequential {
        runtime.batch.max_threads = 1;
    }
    if options.fail_fast {
        runtime.batch.fail_fast = true;
    }
    if options.quiet {
        runtime.batch.progress_reporting = false;
    }

    Ok(runtime)
}

fn run_expressions(options: &CliOptions, runtime: &RuntimeConfig) -> bool {
    let expressions: Vec<&str> = if options.expressions.is_empty() {
        vec![DEMO_EXPRESSION]
    } else {
        options.expressions.iter().map(String::as_str).collect()
    };

    let mut all_succeeded = true;
    for (index, input) in expressions.iter().enumerate() {
        let result = logging::with_input_context(format!("arg {}", index + 1), index, || {
            pipeline::process_input_with_config(input, runtime)
        });

        all_succeeded &= result.is_ok();
        emit_result(input, &result, None, runtime);
    }

    all_succeeded
}

fn run_batch(path: &Path, options: &CliOptions, runtime: &RuntimeConfig) -> bool {
    let config = batch::BatchConfig::from_runtime(runtime);

    match batch::process_file(path, &config) {
        Ok(results) => {
            for outcome in &results.outcomes {
                emit_result(
                    &outcome.entry.input,
                    &outcome.result,
                    Some(outcome.entry.line),
                    runtime,
                );
            }

            if !options.quiet && runtime.output.format == OutputFormat::Text {
                eprintln!("{}", results.summary());
            }

            results.failure_count() == 0
        }
        Err(error) => {
            logging::safe_log_error(error.error_code(), &error.to_string());
            eprintln!("Batch processing failed: {}", error);
            false
        }
    }
}

fn emit_result(
    input: &str,
    result: &Result<PipelineResult, PipelineError>,
    line: Option<usize>,
    runtime: &RuntimeConfig,
) {
    match runtime.output.format {
        OutputFormat::Text => {
            if let Some(line) = line {
                println!("[line {}]", line);
            }
            println!(
                "{}",
                pipeline::render_text(input, result, runtime.output.show_tokens)
            );
        }
        OutputFormat::Json => {
            let mut report = EvaluationReport::from_result(input, result);
            if let Some(line) = line {
                report = report.with_line(line);
            }
            if !runtime.output.show_tokens {
                report = report.without_tokens();
            }
            match report.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => logging::safe_log_error(
                    logging::codes::system::INTERNAL_ERROR,
                    &format!("Failed to serialize report: {}", e),
                ),
            }
        }
    }
}

fn print_help() {
    println!("Sum Evaluator v{}", env!("CARGO_PKG_VERSION"));
    println!("Evaluates additions of non-negative integers, e.g. \"10 + 5 + 5\"");
    println!();
    println!("USAGE:");
    println!("    sum_evaluator                         # Evaluate \"{}\"", DEMO_EXPRESSION);
    println!("    sum_evaluator <expr>... [options]     # Evaluate each argument");
    println!("    sum_evaluator --file <path> [options] # One expression per line");
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --file PATH         Read expressions from a file (# starts a comment line)");
    println!("    --json              Print one JSON report per expression");
    println!("    --no-tokens         Do not print the token sequence");
    println!("    --config PATH       Load runtime preferences from a TOML file");
    println!("    --verbose           Log to the console at debug level");
    println!("    --threads N         Worker threads for --file (default: auto)");
    println!("    --sequential        Evaluate --file expressions on one thread");
    println!("    --fail-fast         Stop at the first failing expression");
    println!("    --quiet             Suppress progress and the batch summary");
    println!("    --diagnostics       Print pipeline and logging diagnostics and exit");
    println!();
    println!("EXIT STATUS:");
    println!("    0 if every expression evaluated, 1 otherwise");
    println!();

    let pipeline_info = pipeline::get_pipeline_info();
    println!("PIPELINE CAPABILITIES:");
    for line in pipeline_info.report().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_uses_demo() {
        let options = parse_cli_args(&[]).unwrap();
        assert_eq!(options, CliOptions::default());
        assert!(options.expressions.is_empty());
        assert_eq!(pipeline::evaluate(DEMO_EXPRESSION).unwrap(), 20);
    }

    #[test]
    fn test_parse_options_and_expressions() {
        let options = parse_cli_args(&args(&[
            "1 + 2",
            "--threads",
            "4",
            "--fail-fast",
            "--json",
            "-3",
        ]))
        .unwrap();

        assert_eq!(options.expressions, vec!["1 + 2".to_string(), "-3".to_string()]);
        assert_eq!(options.threads, Some(4));
        assert!(options.fail_fast);
        assert!(options.json);
    }

    #[test]
    fn test_double_dash_ends_options() {
        let options = parse_cli_args(&args(&["--", "--json"])).unwrap();
        assert_eq!(options.expressions, vec!["--json".to_string()]);
        assert!(!options.json);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_cli_args(&args(&["--threads"])).is_err());
        assert!(parse_cli_args(&args(&["--threads", "many"])).is_err());
        assert!(parse_cli_args(&args(&["--threads", "0"])).is_err());
        assert!(parse_cli_args(&args(&["--bogus"])).is_err());
        assert!(parse_cli_args(&args(&["--file", "a.txt", "1+1"])).is_err());
    }

    #[test]
    fn test_cli_overrides_runtime_config() {
        let options = parse_cli_args(&args(&[
            "--sequential",
            "--no-tokens",
            "--verbose",
            "--quiet",
        ]))
        .unwrap();
        let runtime = load_runtime_config(&options).unwrap();

        assert_eq!(runtime.batch.max_threads, 1);
        assert!(!runtime.output.show_tokens);
        assert!(runtime.logging.enable_console_logging);
        assert_eq!(runtime.logging.min_log_level, LogLevel::Debug);
        assert!(!runtime.batch.progress_reporting);
    }

    #[test]
    fn test_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "[output]\nformat = \"json\"\nshow_tokens = false\n").unwrap();

        let options = parse_cli_args(&args(&["--config", path.to_str().unwrap()])).unwrap();
        let runtime = load_runtime_config(&options).unwrap();
        assert_eq!(runtime.output.format, OutputFormat::Json);
        assert!(!runtime.output.show_tokens);

        let missing = parse_cli_args(&args(&["--config", "/nonexistent/prefs.toml"])).unwrap();
        assert!(load_runtime_config(&missing).is_err());
    }
}
