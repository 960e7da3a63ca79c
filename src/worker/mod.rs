//! Background worker for file export.
//!
//! # Modules
//!
//! - [`handler`]: [`ExportWorker`], the `ZellijWorker` that writes documents
//! - [`messages`]: Request/response types and trace context propagation
//!
//! ```text
//! plugin thread                          worker thread
//!   Action::PostToWorker(msg)
//!     └─ post_message_to ──────────────▶ ExportWorker::on_message
//!                                          └─ write_document
//!   Event::CustomMessage ◀──────────────── post_message_to_plugin(response)
//! ```

pub mod handler;
pub mod messages;

pub use handler::ExportWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse, WORKER_NAME};
