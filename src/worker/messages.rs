//! Plugin ↔ worker message protocol.
//!
//! Messages travel as JSON through Zellij's `post_message_to` /
//! `post_message_to_plugin`. Every request carries an optional
//! [`TraceContext`] so the worker's span joins the plugin-side trace.

use crate::domain::ExportFile;
use serde::{Deserialize, Serialize};

/// Name the worker is registered under and that messages are addressed to.
pub const WORKER_NAME: &str = "export";

/// Trace and parent span ids of the plugin span that sent a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// 32 hex digits.
    pub trace_id: String,
    /// 16 hex digits.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the current span's OpenTelemetry context, if it has a valid one.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Builds a `", stringify!($variant), "` message tagged with the current trace context.")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    export_document(ExportDocument { directory: String, file: ExportFile }),
}

/// Requests handled on the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Write `file.bytes` to `{directory}/{file.filename}`.
    ExportDocument {
        directory: String,
        file: ExportFile,

        #[serde(skip_serializing_if = "Option::is_none", default)]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context attached by the sender.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::ExportDocument { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Replies posted back to the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The document now exists at `path` (host-relative, `/host` stripped).
    DocumentExported { path: String },

    Error { message: String },
}
