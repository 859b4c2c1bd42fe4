//! Per-input error collection with cargo-style output
//!
//! Events logged while an input context is active are grouped under that
//! input's label, so a batch run can report every failing expression at the end.

use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

// ============================================================================
// INPUT CONTEXT
// ============================================================================

/// Identifies the expression currently being evaluated on a thread
#[derive(Debug, Clone)]
pub struct InputContext {
    /// Human-readable label, e.g. `line 3` or `arg 1`
    pub label: String,
    pub input_id: usize,
    pub start_time: Instant,
}

impl InputContext {
    pub fn new(label: impl Into<String>, input_id: usize) -> Self {
        Self {
            label: label.into(),
            input_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

// ============================================================================
// PROCESSING SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_inputs: usize,
    pub successful_inputs: usize,
    pub failed_inputs: usize,
    pub inputs_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
    pub average_input_time: Duration,
}

impl ProcessingSummary {
    pub fn success_rate(&self) -> f64 {
        if self.total_inputs == 0 {
            0.0
        } else {
            self.successful_inputs as f64 / self.total_inputs as f64
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}

// ============================================================================
// ERROR COLLECTOR
// ============================================================================

/// Thread-safe event collector keyed by input label
pub struct ErrorCollector {
    input_events: Mutex<BTreeMap<String, Vec<LogEvent>>>,
    input_contexts: Mutex<BTreeMap<String, InputContext>>,
    processing_start: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            input_events: Mutex::new(BTreeMap::new()),
            input_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    /// Record an event for an input, up to the per-input limit
    pub fn record_event(&self, label: &str, event: LogEvent) {
        let mut events = lock(&self.input_events);
        let input_events = events.entry(label.to_string()).or_default();

        if input_events.len() < MAX_LOG_EVENTS_PER_INPUT {
            input_events.push(event);
        } else if input_events.len() == MAX_LOG_EVENTS_PER_INPUT {
            input_events.push(LogEvent::warning(&format!(
                "Too many events for input (limit: {})",
                MAX_LOG_EVENTS_PER_INPUT
            )));
        }
    }

    /// Register an input so it is counted even if it logs nothing
    pub fn record_input_context(&self, context: InputContext) {
        lock(&self.input_events)
            .entry(context.label.clone())
            .or_default();
        lock(&self.input_contexts).insert(context.label.clone(), context);
    }

    pub fn get_input_events(&self, label: &str) -> Vec<LogEvent> {
        lock(&self.input_events)
            .get(label)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_input_errors(&self, label: &str) -> Vec<LogEvent> {
        lock(&self.input_events)
            .get(label)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn input_has_errors(&self, label: &str) -> bool {
        !self.get_input_errors(label).is_empty()
    }

    pub fn get_all_input_events(&self) -> BTreeMap<String, Vec<LogEvent>> {
        lock(&self.input_events).clone()
    }

    /// Labels of inputs that logged at least one error
    pub fn get_inputs_with_errors(&self) -> Vec<String> {
        lock(&self.input_events)
            .iter()
            .filter(|(_, events)| events.iter().any(|e| e.is_error()))
            .map(|(label, _)| label.clone())
            .collect()
    }

    /// Errors whose code requires halting, with their input label
    pub fn get_critical_errors(&self) -> Vec<(String, LogEvent)> {
        lock(&self.input_events)
            .iter()
            .flat_map(|(label, events)| {
                events
                    .iter()
                    .filter(|e| e.is_error() && e.requires_halt())
                    .map(move |e| (label.clone(), e.clone()))
            })
            .collect()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = lock(&self.input_events);
        let contexts = lock(&self.input_contexts);

        let mut summary = ProcessingSummary {
            total_inputs: events.len(),
            total_processing_time: self.processing_start.elapsed(),
            ..Default::default()
        };

        let mut total_input_time = Duration::ZERO;
        let mut timed_inputs = 0u32;

        for (label, input_events) in events.iter() {
            let errors = input_events.iter().filter(|e| e.is_error()).count();
            let warnings = input_events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.failed_inputs += 1;
            } else if warnings > 0 {
                summary.inputs_with_warnings += 1;
            } else {
                summary.successful_inputs += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;

            if let Some(context) = contexts.get(label) {
                total_input_time += context.elapsed();
                timed_inputs += 1;
            }
        }

        if timed_inputs > 0 {
            summary.average_input_time = total_input_time / timed_inputs;
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        lock(&self.input_events).values().map(|v| v.len()).sum()
    }

    /// (current events, buffer size, fraction used)
    pub fn get_capacity_info(&self) -> (usize, usize, f64) {
        let current = self.total_event_count();
        let max = LOG_BUFFER_SIZE;
        let fraction = if max > 0 {
            current as f64 / max as f64
        } else {
            0.0
        };
        (current, max, fraction)
    }

    pub fn clear(&self) {
        lock(&self.input_events).clear();
        lock(&self.input_contexts).clear();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CARGO-STYLE FORMATTING
// ============================================================================

/// Format collected errors and warnings grouped by input
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (label, events) in &collector.get_all_input_events() {
        let error_events: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
        let warning_events: Vec<_> = events.iter().filter(|e| e.is_warning()).collect();

        if error_events.is_empty() && warning_events.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", label));

        for event in error_events {
            let span_info = event
                .span
                .as_ref()
                .map(|s| format!(" --> {}:{}", label, s))
                .unwrap_or_default();

            output.push_str(&format!(
                "error[{}]: {}{}\n",
                event.code.as_str(),
                event.message,
                span_info
            ));
            output.push_str(&format!(
                "  = severity: {}, category: {}\n",
                event.severity(),
                event.category()
            ));

            for (key, value) in &event.context {
                if key != "input" && key != "input_id" {
                    output.push_str(&format!("  = {}: {}\n", key, value));
                }
            }

            let action = event.recommended_action();
            if action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        for event in warning_events {
            output.push_str(&format!(
                "warning[{}]: {}\n",
                event.code.as_str(),
                event.message
            ));
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.total_errors > 0 {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.total_warnings > 0 {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    output
}
