//! Worker thread that writes exported documents to disk.
//!
//! File I/O is kept off the render thread. Each export is written to a hidden
//! temp file beside the target, flushed, closed, and renamed into place, so a
//! reader never sees a half-written document.

use crate::domain::error::{HypothesizerError, Result};
use crate::domain::ExportFile;
use crate::infrastructure::paths;
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

#[derive(Serialize, Deserialize, Default)]
pub struct ExportWorker {
    /// Documents written since the worker started.
    #[serde(skip)]
    exported: usize,
}

impl ExportWorker {
    /// Writes `file` into `directory`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`HypothesizerError::Worker`] for file names that would escape
    /// `directory`, and [`HypothesizerError::Io`] when any filesystem step fails.
    pub fn write_document(directory: &Path, file: &ExportFile) -> Result<PathBuf> {
        let name = file.filename.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(HypothesizerError::Worker(format!("invalid export file name: {name:?}")));
        }

        fs::create_dir_all(directory)?;
        let target = directory.join(name);
        let temp = directory.join(format!(".{name}.tmp"));

        let written = (|| -> Result<()> {
            let mut handle = fs::File::create(&temp)?;
            handle.write_all(&file.bytes)?;
            handle.sync_all()?;
            Ok(())
        })();

        if let Err(e) = written.and_then(|()| fs::rename(&temp, &target).map_err(Into::into)) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }

        tracing::debug!(
            path = %target.display(),
            bytes = file.bytes.len(),
            mime_type = %file.mime_type,
            "document written"
        );
        Ok(target)
    }

    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Executes one request and builds the reply.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _guard = tracing::debug_span!("worker_handle_message").entered();

        match message {
            WorkerMessage::ExportDocument { directory, file, .. } => {
                match Self::write_document(Path::new(&directory), &file) {
                    Ok(path) => {
                        self.exported += 1;
                        tracing::debug!(exported = self.exported, "export complete");
                        WorkerResponse::DocumentExported {
                            path: paths::strip_host_prefix(&path.to_string_lossy()),
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, filename = %file.filename, "export failed");
                        WorkerResponse::Error {
                            message: format!("Export failed: {e}"),
                        }
                    }
                }
            }
        }
    }
}

static WORKER_TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

impl ZellijWorker<'_> for ExportWorker {
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, Ordering::Relaxed) {
            crate::observability::init_tracing(&crate::Config::default());
        }

        let worker_message: WorkerMessage = match serde_json::from_str(&payload) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return;
            }
        };

        let response = self.handle_message(worker_message);

        match serde_json::to_string(&response) {
            Ok(payload) => post_message_to_plugin(PluginMessage {
                name: message,
                payload,
                worker_name: None,
            }),
            Err(e) => tracing::debug!(error = %e, "failed to serialize worker response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisKind, DisplayPayload};

    fn file(name: &str, body: &str) -> ExportFile {
        ExportFile {
            bytes: body.as_bytes().to_vec(),
            mime_type: "text/markdown".to_string(),
            filename: name.to_string(),
        }
    }

    #[test]
    fn writes_exact_bytes_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let body = "# Survey\n\n- ünïcode • bullets\n";
        let path = ExportWorker::write_document(dir.path(), &file("survey-x.md", body)).unwrap();

        assert_eq!(path, dir.path().join("survey-x.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), body);
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn overwrites_existing_export() {
        let dir = tempfile::tempdir().unwrap();
        ExportWorker::write_document(dir.path(), &file("gaps-a.md", "old")).unwrap();
        ExportWorker::write_document(dir.path(), &file("gaps-a.md", "new")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("gaps-a.md")).unwrap(), "new");
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("2024");
        ExportWorker::write_document(&nested, &file("trends-b.md", "")).unwrap();
        assert!(nested.join("trends-b.md").exists());
    }

    #[test]
    fn rejects_names_with_separators() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["", "..", "../escape.md", "a/b.md"] {
            let err = ExportWorker::write_document(dir.path(), &file(name, "x")).unwrap_err();
            assert!(matches!(err, HypothesizerError::Worker(_)), "{name}");
        }
    }

    #[test]
    fn exported_title_with_slashes_lands_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let payload = DisplayPayload::new("AI/ML in Healthcare", "# Survey", AnalysisKind::Survey);

        let path = ExportWorker::write_document(dir.path(), &payload.export()).unwrap();

        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path, dir.path().join("survey-ai-ml-in-healthcare.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Survey");
    }

    #[test]
    fn handle_message_reports_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = ExportWorker::default();
        let message = WorkerMessage::ExportDocument {
            directory: dir.path().to_string_lossy().into_owned(),
            file: file("survey-c.md", "body"),
            trace_context: None,
        };
        match worker.handle_message(message) {
            WorkerResponse::DocumentExported { path } => assert!(path.ends_with("survey-c.md")),
            other => panic!("unexpected response {other:?}"),
        }

        let bad = WorkerMessage::ExportDocument {
            directory: dir.path().to_string_lossy().into_owned(),
            file: file("a/b.md", "body"),
            trace_context: None,
        };
        assert!(matches!(worker.handle_message(bad), WorkerResponse::Error { .. }));
    }
}
