// Internal modules
pub mod batch;
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use pipeline::{evaluate, ErrorKind, PipelineError, PipelineResult};
pub use tokens::Token;
