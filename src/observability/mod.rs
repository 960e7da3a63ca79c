//! Span export for the plugin and its export worker.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter → JSONL
//! ```
//!
//! Spans land in `{data_dir}/hypothesizer-otlp.json`, one OTLP JSON document
//! per line. The file rolls over at 10 MB and keeps three backups.
//!
//! The filter comes from the `trace_level` plugin option and falls back to
//! `info`.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;

/// Service and scope name stamped on every exported batch.
pub(crate) const SERVICE_NAME: &str = "Hypothesizer";
