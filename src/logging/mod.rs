//! Structured JSON logging.

mod format;

pub use format::{LogEvent, StructuredLogger};
