//! Consolidated error codes and classification system
//!
//! Single source of truth for all error and success codes together with their
//! behavioral metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Expression source error codes (batch files, config files)
pub mod input {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const NO_EXPRESSIONS: Code = Code::new("E008");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const TOO_MANY_EXPRESSIONS: Code = Code::new("E013");
    pub const CONFIG_ERROR: Code = Code::new("E014");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const NUMBER_OVERFLOW: Code = Code::new("E022");
    pub const INPUT_TOO_LONG: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E040");
    pub const INVALID_TOKEN: Code = Code::new("E050");
    pub const SUM_OVERFLOW: Code = Code::new("E052");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const BATCH_PROCESSING_COMPLETE: Code = Code::new("I006");

    // Lexical success codes
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");

    // Syntax success codes
    pub const EVALUATION_COMPLETE: Code = Code::new("I040");
    pub const SYNTAX_VALIDATION_PASSED: Code = Code::new("I041");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        // System errors
        registry.insert(
            "ERR001",
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Internal evaluator error",
                "Report the input that triggered this error",
            ),
        );

        registry.insert(
            "ERR002",
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Evaluator initialization failed",
                "Check runtime configuration and environment variables",
            ),
        );

        // Input source errors
        registry.insert(
            "E005",
            ErrorMetadata::new(
                "E005",
                "Input",
                Severity::High,
                false,
                true,
                "Expression file not found",
                "Verify the file path exists and is readable",
            ),
        );

        registry.insert(
            "E007",
            ErrorMetadata::new(
                "E007",
                "Input",
                Severity::High,
                false,
                true,
                "Expression file exceeds size limit",
                "Split the file into smaller batches",
            ),
        );

        registry.insert(
            "E008",
            ErrorMetadata::new(
                "E008",
                "Input",
                Severity::Medium,
                true,
                false,
                "No expressions found in input",
                "Add at least one non-comment expression line",
            ),
        );

        registry.insert(
            "E011",
            ErrorMetadata::new(
                "E011",
                "Input",
                Severity::High,
                false,
                true,
                "I/O error while reading input",
                "Check file permissions and disk state",
            ),
        );

        registry.insert(
            "E013",
            ErrorMetadata::new(
                "E013",
                "Input",
                Severity::High,
                false,
                true,
                "Too many expressions in one batch",
                "Reduce the batch size or raise max_expressions_per_batch",
            ),
        );

        registry.insert(
            "E014",
            ErrorMetadata::new(
                "E014",
                "Input",
                Severity::High,
                false,
                true,
                "Runtime configuration could not be loaded",
                "Check the configuration file path and TOML syntax",
            ),
        );

        // Lexical errors
        registry.insert(
            "E020",
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::High,
                true,
                false,
                "Invalid character in expression",
                "Use only digits, spaces and '+'",
            ),
        );

        registry.insert(
            "E022",
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::High,
                true,
                false,
                "Number literal exceeds the 64-bit unsigned range",
                "Use literals no larger than 18446744073709551615",
            ),
        );

        registry.insert(
            "E023",
            ErrorMetadata::new(
                "E023",
                "Lexical",
                Severity::High,
                true,
                false,
                "Expression exceeds maximum input length",
                "Shorten the expression or split it into several",
            ),
        );

        registry.insert(
            "E027",
            ErrorMetadata::new(
                "E027",
                "Lexical",
                Severity::High,
                true,
                false,
                "Expression produces too many tokens",
                "Reduce the number of operands",
            ),
        );

        // Syntax errors
        registry.insert(
            "E040",
            ErrorMetadata::new(
                "E040",
                "Syntax",
                Severity::High,
                true,
                false,
                "Unexpected end of input",
                "Add a number after the trailing '+'",
            ),
        );

        registry.insert(
            "E050",
            ErrorMetadata::new(
                "E050",
                "Syntax",
                Severity::High,
                true,
                false,
                "Token does not fit the expression grammar",
                "Separate numbers with '+' and start with a number",
            ),
        );

        registry.insert(
            "E052",
            ErrorMetadata::new(
                "E052",
                "Syntax",
                Severity::High,
                true,
                false,
                "Sum exceeds the 64-bit unsigned range",
                "Split the expression into smaller sums",
            ),
        );

        // Success codes
        registry.insert(
            "I001",
            ErrorMetadata::new(
                "I001",
                "Success",
                Severity::Low,
                true,
                false,
                "Operation completed successfully",
                "No action required",
            ),
        );

        registry.insert(
            "I004",
            ErrorMetadata::new(
                "I004",
                "Success",
                Severity::Low,
                true,
                false,
                "System initialization completed",
                "No action required",
            ),
        );

        registry.insert(
            "I006",
            ErrorMetadata::new(
                "I006",
                "Success",
                Severity::Low,
                true,
                false,
                "Batch processing completed",
                "Review the batch summary",
            ),
        );

        registry.insert(
            "I020",
            ErrorMetadata::new(
                "I020",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Tokenization completed successfully",
                "Continue to evaluation",
            ),
        );

        registry.insert(
            "I040",
            ErrorMetadata::new(
                "I040",
                "Syntax",
                Severity::Low,
                true,
                false,
                "Expression evaluated successfully",
                "No action required",
            ),
        );

        registry.insert(
            "I041",
            ErrorMetadata::new(
                "I041",
                "Syntax",
                Severity::Low,
                true,
                false,
                "Syntax validation passed",
                "Continue to evaluation",
            ),
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from error code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_is_registered() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            input::FILE_NOT_FOUND,
            input::FILE_TOO_LARGE,
            input::NO_EXPRESSIONS,
            input::IO_ERROR,
            input::TOO_MANY_EXPRESSIONS,
            input::CONFIG_ERROR,
            lexical::INVALID_CHARACTER,
            lexical::NUMBER_OVERFLOW,
            lexical::INPUT_TOO_LONG,
            lexical::TOO_MANY_TOKENS,
            syntax::UNEXPECTED_END_OF_INPUT,
            syntax::INVALID_TOKEN,
            syntax::SUM_OVERFLOW,
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::BATCH_PROCESSING_COMPLETE,
            success::TOKENIZATION_COMPLETE,
            success::EVALUATION_COMPLETE,
            success::SYNTAX_VALIDATION_PASSED,
        ];

        for code in codes {
            let metadata = get_error_metadata(code.as_str())
                .unwrap_or_else(|| panic!("missing metadata for {}", code));
            assert_eq!(metadata.code, code.as_str());
        }
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("E999"), "Unknown error");
        assert_eq!(get_category("E999"), "Unknown");
        assert_eq!(get_severity("E999"), Severity::Medium);
        assert!(is_recoverable("E999"));
        assert!(!requires_halt("E999"));
    }

    #[test]
    fn test_lexical_classification() {
        assert_eq!(get_category("E020"), "Lexical");
        assert_eq!(get_severity("E020"), Severity::High);
        assert!(requires_halt("ERR001"));
        assert_eq!(get_action("E040"), "Add a number after the trailing '+'");
    }
}
