//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler never talks to Zellij directly. It returns a `Vec<Action>`
//! and the plugin shim turns each one into a host call: a web request, a timer,
//! a worker message or hiding the pane.
//!
//! # Example
//!
//! ```rust
//! use hypothesizer::app::Action;
//!
//! let actions = vec![Action::Search { token: 1, query: "transformers".to_string() }];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::domain::{AnalysisRequest, GenerationRequest};
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Issues a paper search. `token` is echoed back with the response.
    Search {
        token: u64,
        query: String,
    },

    /// Issues a hypothesis generation request.
    Generate {
        token: u64,
        request: GenerationRequest,
    },

    /// Issues a literature analysis request (survey, gaps or trends).
    Analyze {
        token: u64,
        request: AnalysisRequest,
    },

    /// Arms the deferred "scroll the paper selection into view" timer.
    ScheduleScroll,

    /// Posts a message to the background worker thread.
    PostToWorker(WorkerMessage),
}
