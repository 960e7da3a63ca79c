//! File-backed `SpanExporter` and the provider that drives it.

use super::file_writer::FileWriter;
use super::span_formatter::SpanFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::future::ready;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Appends every exported batch to a rotating JSONL file.
#[derive(Debug)]
struct FileSpanExporter {
    writer: FileWriter,
    formatter: SpanFormatter,
    closed: AtomicBool,
}

impl FileSpanExporter {
    const fn new(path: PathBuf, resource: Resource) -> Self {
        Self {
            writer: FileWriter::new(path),
            formatter: SpanFormatter::new(resource),
            closed: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TraceError::from("span exporter already shut down"));
        }
        let line = self.formatter.format_batch(batch).to_string();
        self.writer
            .write_line(&line)
            .map_err(|e| TraceError::from(e.to_string()))
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        Box::pin(ready(self.write_batch(&batch)))
    }

    fn shutdown(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    // The resource is fixed at construction.
    fn set_resource(&mut self, _resource: &Resource) {}
}

/// Builds a provider that exports each span synchronously to `path`.
///
/// Zellij plugins run single-threaded in WASM, so the simple (unbatched)
/// processor is used; there is no runtime for a batch exporter to spawn on.
pub fn create_tracer_provider(path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter::new(path, resource.clone());
    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
