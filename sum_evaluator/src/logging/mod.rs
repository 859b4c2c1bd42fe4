//! Global logging
//!
//! Thread-safe global logging with per-input context, cargo-style error
//! reporting, and a macro interface. Nothing is logged until
//! [`init_global_logging`] has been called.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, InputContext, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static INPUT_CONTEXT: RefCell<Option<InputContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the runtime logging preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(LoggingService::with_config());
    init_global_logging_with_service(logging_service.clone())?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::lexical::INVALID_CHARACTER,
        codes::syntax::UNEXPECTED_END_OF_INPUT,
    ] {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with a custom service
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized")?;

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

/// Whether a debug event would reach the global logger
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// INPUT CONTEXT MANAGEMENT
// ============================================================================

/// Set the input context for the current thread
pub fn set_input_context(label: impl Into<String>, input_id: usize) {
    let context = InputContext::new(label, input_id);

    if let Some(collector) = try_get_global_error_collector() {
        collector.record_input_context(context.clone());
    }

    INPUT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

pub fn clear_input_context() {
    INPUT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with an input context set on the current thread
pub fn with_input_context<F, R>(label: impl Into<String>, input_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_input_context(label, input_id);
    let result = f();
    clear_input_context();
    result
}

pub fn get_current_input_context() -> Option<InputContext> {
    INPUT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn attach_context(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if config::include_input_context() {
        if let Some(input_ctx) = get_current_input_context() {
            event = event
                .with_input_label(&input_ctx.label)
                .with_context("input_id", &input_ctx.input_id.to_string());
        }
    }

    event
}

/// Used by `log_error!`. Errors are also recorded against the current input.
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    let mut event = attach_context(LogEvent::error(code, message), context);
    if let Some(s) = span {
        event = event.with_span(s);
    }

    if let (Some(input_ctx), Some(collector)) =
        (get_current_input_context(), try_get_global_error_collector())
    {
        collector.record_event(&input_ctx.label, event.clone());
    }

    logger.log_event(event);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_context(LogEvent::success(code, message), context));
    }
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_context(LogEvent::info(message), context));
    }
}

/// Used by `log_warning!`. Warnings are also recorded against the current input.
pub fn log_warning_with_context(message: &str, context: Vec<(&str, &str)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    let event = attach_context(LogEvent::warning(message), context);

    if let (Some(input_ctx), Some(collector)) =
        (get_current_input_context(), try_get_global_error_collector())
    {
        collector.record_event(&input_ctx.label, event.clone());
    }

    logger.log_event(event);
}

/// Used by `log_debug!`
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(attach_context(LogEvent::debug(message), context));
    }
}

// ============================================================================
// SUMMARIES
// ============================================================================

pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(|collector| collector.get_summary())
        .unwrap_or_default()
}

/// Print collected errors cargo-style
pub fn print_cargo_style_summary() {
    if let Some(collector) = try_get_global_error_collector() {
        let output = collector::format_cargo_style_errors(collector);
        if !output.is_empty() {
            eprint!("{}", output);
        }
    }
}

pub fn clear_error_collection() {
    if let Some(collector) = try_get_global_error_collector() {
        collector.clear();
    }
}

pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));

    if let Some(collector) = try_get_global_error_collector() {
        let (current, max, fraction) = collector.get_capacity_info();
        diagnostics.push_str(&format!(
            "Capacity: {}/{} ({:.1}%)\n",
            current,
            max,
            fraction * 100.0
        ));

        let summary = collector.get_summary();
        diagnostics.push_str(&format!("Inputs processed: {}\n", summary.total_inputs));
        diagnostics.push_str(&format!("Total errors: {}\n", summary.total_errors));
        diagnostics.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

/// Error logging that falls back to stderr when uninitialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shared memory sink for the process-wide logger. Other tests may log to
    /// it concurrently, so assertions look for their own unique messages.
    fn shared_memory_logger() -> &'static Arc<MemoryLogger> {
        static MEMORY: OnceLock<Arc<MemoryLogger>> = OnceLock::new();
        MEMORY.get_or_init(|| {
            let memory = Arc::new(MemoryLogger::with_capacity(10_000));
            let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
            let _ = init_global_logging_with_service(service);
            memory
        })
    }

    fn events_with_message(memory: &MemoryLogger, message: &str) -> Vec<LogEvent> {
        memory
            .get_events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }

    #[test]
    fn test_input_context_management() {
        assert!(get_current_input_context().is_none());

        set_input_context("line 7", 6);
        let context = get_current_input_context();
        assert_eq!(context.map(|c| c.label), Some("line 7".to_string()));

        clear_input_context();
        assert!(get_current_input_context().is_none());
    }

    #[test]
    fn test_with_input_context() {
        let result = with_input_context("arg 2", 1, || {
            assert_eq!(get_current_input_context().map(|c| c.input_id), Some(1));
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_input_context().is_none());
    }

    #[test]
    fn test_macros_reach_global_logger() {
        let memory = shared_memory_logger();
        if !is_initialized() {
            return;
        }

        crate::log_error!(
            codes::lexical::INVALID_CHARACTER,
            "macro test error",
            span = crate::utils::Span::single(2),
            "character" => '&'
        );
        crate::log_success!(codes::success::EVALUATION_COMPLETE, "macro test success",
            "value" => 20u64
        );
        crate::log_debug!("macro test debug", "step" => 1);

        let errors = events_with_message(memory, "macro test error");
        if errors.is_empty() {
            // Another logger won the global initialization race
            return;
        }
        assert_eq!(errors[0].span, Some(crate::utils::Span::single(2)));
        assert_eq!(errors[0].context.get("character").map(String::as_str), Some("&"));

        let successes = events_with_message(memory, "macro test success");
        assert_eq!(successes[0].context.get("value").map(String::as_str), Some("20"));
        assert_eq!(events_with_message(memory, "macro test debug").len(), 1);
    }

    #[test]
    fn test_errors_are_collected_per_input() {
        let memory = shared_memory_logger();
        if !is_initialized() {
            return;
        }

        with_input_context("collector test input", 99, || {
            crate::log_error!(codes::syntax::INVALID_TOKEN, "collector test error");
        });

        if events_with_message(memory, "collector test error").is_empty() {
            return;
        }

        let collector = try_get_global_error_collector();
        assert!(collector
            .map(|c| c.input_has_errors("collector test input"))
            .unwrap_or(false));
    }

    #[test]
    fn test_safe_logging() {
        safe_log_error(codes::system::INTERNAL_ERROR, "Test error");
    }

    #[test]
    fn test_diagnostics() {
        let diagnostics = get_system_diagnostics();
        assert!(diagnostics.contains("Logging System Diagnostics"));
        assert!(diagnostics.contains("Logging Configuration"));
    }
}
