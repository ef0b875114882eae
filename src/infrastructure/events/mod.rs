//! Event Sink Implementations
//!
//! Console output for humans, NDJSON for CI.

pub mod console;
pub mod json;

pub use console::ConsoleEventSink;
pub use json::JsonEventSink;
