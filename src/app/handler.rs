//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place state changes. It takes one [`Event`],
//! mutates [`AppState`] through its workflow methods, and returns whether the
//! pane needs a re-render together with the side effects to run.
//!
//! # Event Types
//!
//! - **Input**: `Char`, `Backspace`, `FocusNext`, `FocusPrev`, `CursorUp`, `CursorDown`
//! - **Workflow**: `SubmitSearch`, `AddHighlighted`, `RemoveHighlighted`,
//!   `AddPaper`, `RemovePaper`, `Generate`, `RequestAnalysis`
//! - **Viewer**: `CloseViewer`, `ExportViewer`, `ViewerScroll`
//! - **System**: `Timer`, `Teardown`, `Resize`, the `*Completed` service events
//!   and `WorkerResponse`
//!
//! # Example
//!
//! ```rust
//! use hypothesizer::app::{handle_event, Action, AppState, Event};
//! use hypothesizer::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default(), "/host");
//! for c in "bert".chars() {
//!     handle_event(&mut state, &Event::Char(c))?;
//! }
//! let (_, actions) = handle_event(&mut state, &Event::SubmitSearch)?;
//! assert_eq!(actions, vec![Action::Search { token: 1, query: "bert".to_string() }]);
//! # Ok::<(), hypothesizer::HypothesizerError>(())
//! ```

use super::modes::{Focus, Lifecycle};
use super::state::Notice;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{AnalysisKind, GenerationResult, Paper};
use crate::worker::{WorkerMessage, WorkerResponse};

/// Inputs to the state machine: user intents, host callbacks and service results.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Types a character into the focused text field.
    Char(char),
    /// Deletes the last character of the focused text field.
    Backspace,
    /// Moves focus forward in the Tab cycle.
    FocusNext,
    /// Moves focus backward in the Tab cycle.
    FocusPrev,
    /// Moves the focused list's cursor up (wraps).
    CursorUp,
    /// Moves the focused list's cursor down (wraps).
    CursorDown,

    /// Submits the query field as a search.
    SubmitSearch,
    /// Adds the result under the cursor to the selection.
    AddHighlighted,
    /// Removes the selected paper under the cursor.
    RemoveHighlighted,
    AddPaper(Paper),
    RemovePaper(String),
    /// Generates a hypothesis from the selection and topic.
    Generate,
    /// Requests a survey, gaps or trends analysis of the selection.
    RequestAnalysis(AnalysisKind),

    /// Scrolls the page by a number of rows (negative is up).
    ScrollPage(i32),
    /// Closes the analysis viewer.
    CloseViewer,
    /// Exports the document shown in the analysis viewer.
    ExportViewer,
    /// Scrolls the viewer body by a number of rows (negative is up).
    ViewerScroll(i32),

    /// Hides the plugin pane.
    Hide,
    /// The post-search scroll timer fired.
    Timer,
    /// The plugin is closing; stop accepting asynchronous writes.
    Teardown,
    /// Pane size changed.
    Resize { rows: usize, cols: usize },

    SearchCompleted {
        token: u64,
        outcome: std::result::Result<Vec<Paper>, String>,
    },
    GenerationCompleted {
        token: u64,
        outcome: std::result::Result<GenerationResult, String>,
    },
    AnalysisCompleted {
        token: u64,
        outcome: std::result::Result<String, String>,
    },

    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The boolean is `true` when the visible UI changed.
///
/// # Errors
///
/// None of the current transitions fail; the `Result` keeps the handler
/// signature stable for the plugin shim.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    if state.lifecycle == Lifecycle::TornDown && !matches!(event, Event::Teardown) {
        tracing::debug!("plugin torn down, ignoring event");
        return Ok((false, vec![]));
    }

    match event {
        Event::Char(c) => {
            let Some(input) = state.focused_input_mut() else {
                return Ok((false, vec![]));
            };
            input.push(*c);
            Ok((true, vec![]))
        }
        Event::Backspace => {
            let Some(input) = state.focused_input_mut() else {
                return Ok((false, vec![]));
            };
            Ok((input.pop().is_some(), vec![]))
        }
        Event::FocusNext => {
            state.focus = state.focus.next();
            state.reveal_cursor();
            Ok((true, vec![]))
        }
        Event::FocusPrev => {
            state.focus = state.focus.prev();
            state.reveal_cursor();
            Ok((true, vec![]))
        }
        Event::CursorUp | Event::CursorDown => {
            let moved = state.move_cursor(matches!(event, Event::CursorDown));
            if moved {
                state.reveal_cursor();
            }
            Ok((moved, vec![]))
        }

        Event::SubmitSearch => {
            let query = state.query_input.clone();
            Ok(state
                .submit_search(&query)
                .map_or((false, vec![]), |action| (true, vec![action])))
        }
        Event::AddHighlighted => {
            let Some(paper) = state.highlighted_result().cloned() else {
                return Ok((false, vec![]));
            };
            Ok((state.add_paper(paper), vec![]))
        }
        Event::RemoveHighlighted => {
            let Some(id) = state.highlighted_selection().map(|p| p.id.clone()) else {
                return Ok((false, vec![]));
            };
            Ok((state.remove_paper(&id), vec![]))
        }
        Event::AddPaper(paper) => Ok((state.add_paper(paper.clone()), vec![])),
        Event::RemovePaper(id) => Ok((state.remove_paper(id), vec![])),
        Event::Generate => {
            let action = state.generate();
            Ok((true, action.into_iter().collect()))
        }
        Event::RequestAnalysis(kind) => {
            let action = state.request_analysis(*kind);
            Ok((true, action.into_iter().collect()))
        }

        Event::ScrollPage(delta) => Ok((state.scroll_page(*delta), vec![])),
        Event::CloseViewer => {
            if !state.analysis.visible {
                return Ok((false, vec![]));
            }
            state.analysis.visible = false;
            state.analysis.scroll = 0;
            Ok((true, vec![]))
        }
        Event::ExportViewer => {
            if !state.analysis.visible {
                return Ok((false, vec![]));
            }
            let Some(payload) = &state.analysis.payload else {
                return Ok((false, vec![]));
            };
            let file = payload.export();
            tracing::debug!(filename = %file.filename, bytes = file.bytes.len(), "exporting analysis");
            let message = WorkerMessage::export_document(state.export_dir.clone(), file);
            Ok((false, vec![Action::PostToWorker(message)]))
        }
        Event::ViewerScroll(delta) => Ok((state.scroll_viewer(*delta), vec![])),

        Event::Hide => Ok((false, vec![Action::CloseFocus])),
        Event::Timer => Ok((state.apply_pending_scroll(), vec![])),
        Event::Teardown => {
            tracing::debug!("tearing down, late responses will be dropped");
            state.lifecycle = Lifecycle::TornDown;
            state.pending_scroll = false;
            Ok((false, vec![]))
        }
        Event::Resize { rows, cols } => {
            let changed = state.viewport.rows != *rows || state.viewport.cols != *cols;
            state.set_viewport(*rows, *cols);
            Ok((changed, vec![]))
        }

        Event::SearchCompleted { token, outcome } => {
            if !state.complete_search(*token, outcome.clone()) {
                return Ok((false, vec![]));
            }
            let actions = if state.pending_scroll {
                vec![Action::ScheduleScroll]
            } else {
                vec![]
            };
            if state.focus == Focus::Results && state.search.results.is_empty() {
                state.focus = Focus::Query;
            }
            Ok((true, actions))
        }
        Event::GenerationCompleted { token, outcome } => {
            Ok((state.complete_generation(*token, outcome.clone()), vec![]))
        }
        Event::AnalysisCompleted { token, outcome } => {
            Ok((state.complete_analysis(*token, outcome.clone()), vec![]))
        }

        Event::WorkerResponse(response) => {
            let notice = match response {
                WorkerResponse::DocumentExported { path } => {
                    tracing::info!(path = %path, "analysis exported");
                    Notice {
                        text: format!("Exported to {path}"),
                        is_error: false,
                    }
                }
                WorkerResponse::Error { message } => {
                    tracing::error!("Worker error: {}", message);
                    Notice {
                        text: message.clone(),
                        is_error: true,
                    }
                }
            };
            state.notice = Some(notice);
            Ok((true, vec![]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::Anchor;
    use crate::app::state::{
        SearchStatus, ANALYSIS_FAILED_MESSAGE, GENERATION_FAILED_MESSAGE, GENERATION_GUARD_MESSAGE,
        NO_RESULTS_MESSAGE, SEARCH_FAILED_MESSAGE,
    };
    use crate::domain::{GenerationRequest, MARKDOWN_MIME};
    use crate::ui::Theme;

    fn state() -> AppState {
        AppState::new(Theme::default(), "/host/exports")
    }

    fn paper(id: &str) -> Paper {
        Paper::new(id, format!("Paper {id}"), vec!["A. Author".to_string()], "2019-07-01")
    }

    fn run(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
        handle_event(state, &event).unwrap()
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            run(state, Event::Char(c));
        }
    }

    #[test]
    fn whitespace_query_sends_nothing() {
        let mut s = state();
        type_text(&mut s, "   ");
        let (render, actions) = run(&mut s, Event::SubmitSearch);
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(s.search.status, SearchStatus::Idle);
    }

    #[test]
    fn search_round_trip_schedules_scroll() {
        let mut s = state();
        type_text(&mut s, "graph neural");
        let (_, actions) = run(&mut s, Event::SubmitSearch);
        assert_eq!(
            actions,
            vec![Action::Search {
                token: 1,
                query: "graph neural".into()
            }]
        );
        assert_eq!(s.search.status, SearchStatus::InFlight);

        let (render, actions) = run(
            &mut s,
            Event::SearchCompleted {
                token: 1,
                outcome: Ok(vec![paper("1"), paper("2")]),
            },
        );
        assert!(render);
        assert_eq!(actions, vec![Action::ScheduleScroll]);
        assert_eq!(s.search.results.len(), 2);

        s.anchor = Anchor::Top;
        s.page_offset = 5;
        let (render, _) = run(&mut s, Event::Timer);
        assert!(render);
        assert_eq!(s.anchor, Anchor::PaperSelection);
        assert_eq!(s.page_offset, 0);

        let (render, _) = run(&mut s, Event::Timer);
        assert!(!render);
    }

    #[test]
    fn empty_results_are_soft_failure_with_scroll() {
        let mut s = state();
        type_text(&mut s, "zzz");
        run(&mut s, Event::SubmitSearch);
        let (_, actions) = run(&mut s, Event::SearchCompleted { token: 1, outcome: Ok(vec![]) });
        assert_eq!(actions, vec![Action::ScheduleScroll]);
        assert_eq!(s.search.status, SearchStatus::NoResults);
        assert_eq!(s.search.error_message.as_deref(), Some(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn failed_search_shows_fixed_message_without_scroll() {
        let mut s = state();
        type_text(&mut s, "q");
        run(&mut s, Event::SubmitSearch);
        let (_, actions) = run(
            &mut s,
            Event::SearchCompleted {
                token: 1,
                outcome: Err("Service error (status 500): boom".into()),
            },
        );
        assert!(actions.is_empty());
        assert_eq!(s.search.status, SearchStatus::Failed);
        assert_eq!(s.search.error_message.as_deref(), Some(SEARCH_FAILED_MESSAGE));
    }

    #[test]
    fn later_search_supersedes_earlier_one() {
        let mut s = state();
        type_text(&mut s, "a");
        run(&mut s, Event::SubmitSearch);
        run(&mut s, Event::SubmitSearch);

        let (render, actions) = run(&mut s, Event::SearchCompleted { token: 2, outcome: Ok(vec![paper("new")]) });
        assert!(render);
        assert_eq!(actions, vec![Action::ScheduleScroll]);

        let (render, actions) = run(&mut s, Event::SearchCompleted { token: 1, outcome: Err("late".into()) });
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(s.search.status, SearchStatus::Succeeded);
        assert_eq!(s.search.results[0].id, "new");
    }

    #[test]
    fn add_is_idempotent_and_remove_of_absent_is_noop() {
        let mut s = state();
        assert!(run(&mut s, Event::AddPaper(paper("1"))).0);
        assert!(!run(&mut s, Event::AddPaper(paper("1"))).0);
        assert_eq!(s.selection.len(), 1);

        assert!(!run(&mut s, Event::RemovePaper("missing".into())).0);
        assert!(run(&mut s, Event::RemovePaper("1".into())).0);
        assert!(s.selection.is_empty());
    }

    #[test]
    fn keyboard_add_and_remove_follow_cursors() {
        let mut s = state();
        s.search.results = vec![paper("1"), paper("2")];
        run(&mut s, Event::FocusNext);
        assert_eq!(s.focus, Focus::Results);
        run(&mut s, Event::CursorDown);
        run(&mut s, Event::AddHighlighted);
        assert_eq!(s.selection.ids(), vec!["2".to_string()]);

        run(&mut s, Event::FocusNext);
        assert_eq!(s.focus, Focus::Selection);
        run(&mut s, Event::RemoveHighlighted);
        assert!(s.selection.is_empty());
    }

    #[test]
    fn list_focus_does_not_take_text() {
        let mut s = state();
        s.focus = Focus::Results;
        assert!(!run(&mut s, Event::Char('x')).0);
        assert!(s.query_input.is_empty());

        s.focus = Focus::Topic;
        type_text(&mut s, "ml");
        assert_eq!(s.topic, "ml");
        assert!(run(&mut s, Event::Backspace).0);
        assert_eq!(s.topic, "m");
    }

    #[test]
    fn generate_guard_shows_message_and_sends_nothing() {
        let mut s = state();
        s.focus = Focus::Topic;
        type_text(&mut s, "Healthcare");
        let (_, actions) = run(&mut s, Event::Generate);
        assert!(actions.is_empty());
        assert_eq!(s.generation.error.as_deref(), Some(GENERATION_GUARD_MESSAGE));
    }

    #[test]
    fn generate_flow_success_and_failure() {
        let mut s = state();
        run(&mut s, Event::AddPaper(paper("p1")));
        s.topic = "Multimodal Learning in Healthcare".into();

        let (_, actions) = run(&mut s, Event::Generate);
        assert_eq!(
            actions,
            vec![Action::Generate {
                token: 1,
                request: GenerationRequest {
                    paper_ids: vec!["p1".into()],
                    topic: "Multimodal Learning in Healthcare".into(),
                },
            }]
        );
        let (_, again) = run(&mut s, Event::Generate);
        assert!(again.is_empty());

        run(
            &mut s,
            Event::GenerationCompleted {
                token: 1,
                outcome: Ok(GenerationResult::new("**H**: fusion helps")),
            },
        );
        assert_eq!(s.generation.result.as_ref().unwrap().hypothesis, "**H**: fusion helps");

        run(&mut s, Event::Generate);
        run(&mut s, Event::GenerationCompleted { token: 2, outcome: Err("502".into()) });
        assert!(s.generation.result.is_none());
        assert_eq!(s.generation.error.as_deref(), Some(GENERATION_FAILED_MESSAGE));
        assert!(!s.generation.generating);
    }

    #[test]
    fn analysis_opens_viewer_and_exports() {
        let mut s = state();
        run(&mut s, Event::AddPaper(paper("p1")));
        s.topic = "Deep Learning Ethics".into();

        let (_, actions) = run(&mut s, Event::RequestAnalysis(AnalysisKind::Survey));
        let [Action::Analyze { token, request }] = actions.as_slice() else {
            panic!("expected one analyze action, got {actions:?}");
        };
        assert_eq!(request.kind, AnalysisKind::Survey);

        run(
            &mut s,
            Event::AnalysisCompleted {
                token: *token,
                outcome: Ok("# Survey\n\nBody".into()),
            },
        );
        assert!(s.analysis.visible);

        let (_, actions) = run(&mut s, Event::ExportViewer);
        match actions.as_slice() {
            [Action::PostToWorker(WorkerMessage::ExportDocument { directory, file, .. })] => {
                assert_eq!(directory, "/host/exports");
                assert_eq!(file.filename, "survey-deep-learning-ethics.md");
                assert_eq!(file.mime_type, MARKDOWN_MIME);
                assert_eq!(String::from_utf8(file.bytes.clone()).unwrap(), "# Survey\n\nBody");
            }
            other => panic!("unexpected actions {other:?}"),
        }

        assert!(run(&mut s, Event::CloseViewer).0);
        assert!(!s.analysis.visible);
        assert!(run(&mut s, Event::ExportViewer).1.is_empty());
    }

    #[test]
    fn analysis_failure_sets_message() {
        let mut s = state();
        run(&mut s, Event::AddPaper(paper("p1")));
        s.topic = "t".into();
        run(&mut s, Event::RequestAnalysis(AnalysisKind::Gaps));
        run(&mut s, Event::AnalysisCompleted { token: 1, outcome: Err("x".into()) });
        assert_eq!(s.analysis.error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
        assert!(!s.analysis.visible);
    }

    #[test]
    fn teardown_drops_late_results_and_timers() {
        let mut s = state();
        type_text(&mut s, "q");
        run(&mut s, Event::SubmitSearch);
        run(&mut s, Event::Teardown);

        let (render, actions) = run(&mut s, Event::SearchCompleted { token: 1, outcome: Ok(vec![paper("1")]) });
        assert!(!render);
        assert!(actions.is_empty());
        assert_eq!(s.search.status, SearchStatus::InFlight);
        assert!(!run(&mut s, Event::Timer).0);
        assert!(!run(&mut s, Event::Char('x')).0);
    }

    #[test]
    fn worker_responses_become_notices() {
        let mut s = state();
        run(
            &mut s,
            Event::WorkerResponse(WorkerResponse::DocumentExported {
                path: "/exports/a.md".into(),
            }),
        );
        assert_eq!(s.notice.as_ref().unwrap().text, "Exported to /exports/a.md");
        assert!(!s.notice.as_ref().unwrap().is_error);

        run(
            &mut s,
            Event::WorkerResponse(WorkerResponse::Error {
                message: "Export failed: denied".into(),
            }),
        );
        assert!(s.notice.as_ref().unwrap().is_error);
    }

    #[test]
    fn hide_emits_close_focus() {
        let mut s = state();
        assert_eq!(run(&mut s, Event::Hide).1, vec![Action::CloseFocus]);
    }
}
