//! Application state and the search → select → generate workflow.
//!
//! [`AppState`] is the single owner of every piece of mutable UI state: the
//! search region, the selection set, the topic and generation result, and the
//! analysis viewer's visibility. The viewer itself is stateless; it is drawn
//! from whatever [`AnalysisState`] says.
//!
//! # Request Tokens
//!
//! Every outbound call gets a token from [`RequestTokens`]. Completions carry
//! the token back, and only the completion matching the most recently issued
//! token for that action is applied. A slow response to an old search can
//! therefore never overwrite the results of a newer one.
//!
//! # Example
//!
//! ```rust
//! use hypothesizer::app::{Action, AppState};
//! use hypothesizer::ui::Theme;
//!
//! let mut state = AppState::new(Theme::default(), "/host");
//! assert!(state.submit_search("   ").is_none());
//! assert!(matches!(state.submit_search("transformers"), Some(Action::Search { .. })));
//! ```

use super::actions::Action;
use super::modes::{Anchor, Focus, Lifecycle};
use super::view::Viewport;
use crate::domain::{
    AnalysisKind, AnalysisRequest, DisplayPayload, GenerationRequest, GenerationResult, Paper,
    SelectionSet,
};
use crate::ui::theme::Theme;

/// Shown when the search call fails.
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred while searching. Please try again.";
/// Shown when the search call succeeds with zero papers.
pub const NO_RESULTS_MESSAGE: &str = "No papers found matching your query. Try different keywords.";
/// Shown when generate/analyze is attempted without papers or topic.
pub const GENERATION_GUARD_MESSAGE: &str =
    "Please select at least one paper and enter a research topic.";
/// Shown when the generation call fails.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate hypothesis. Please try again.";
/// Shown when the analysis call fails.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to generate analysis. Please try again.";

/// Lifecycle of the most recent search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    /// The call succeeded but matched nothing. Rendered like a failure, kept
    /// apart so callers can tell "empty" from "broken".
    NoResults,
    Failed,
}

/// Search region state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// The last submitted (non-blank) query.
    pub query: String,
    pub status: SearchStatus,
    pub results: Vec<Paper>,
    pub error_message: Option<String>,
}

/// Generation region state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationState {
    pub generating: bool,
    pub result: Option<GenerationResult>,
    /// Validation or service error shown under the generate button.
    pub error: Option<String>,
}

/// An analysis request waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnalysis {
    pub kind: AnalysisKind,
    pub title: String,
}

/// Controller-side state of the analysis viewer.
///
/// `visible` and `payload` are the viewer's only inputs; the close and export
/// keys are routed back here through the event handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisState {
    pub visible: bool,
    pub payload: Option<DisplayPayload>,
    /// First body line shown in the viewer's scroll region.
    pub scroll: usize,
    pub pending: Option<PendingAnalysis>,
    pub error: Option<String>,
}

/// Monotonic per-action request counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestTokens {
    pub search: u64,
    pub generate: u64,
    pub analysis: u64,
}

impl RequestTokens {
    fn next_search(&mut self) -> u64 {
        self.search += 1;
        self.search
    }

    fn next_generate(&mut self) -> u64 {
        self.generate += 1;
        self.generate
    }

    fn next_analysis(&mut self) -> u64 {
        self.analysis += 1;
        self.analysis
    }
}

/// Transient message shown above the footer (export results, worker errors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    pub search: SearchState,
    /// Text currently typed into the query field.
    pub query_input: String,
    pub selection: SelectionSet,
    pub topic: String,
    pub generation: GenerationState,
    pub analysis: AnalysisState,

    pub focus: Focus,
    /// Highlighted row in the results list.
    pub results_cursor: usize,
    /// Highlighted row in the selection list.
    pub selection_cursor: usize,

    pub anchor: Anchor,
    /// Manual scroll relative to `anchor`, in rows.
    pub page_offset: i32,
    /// Set when a post-search scroll timer is armed and not yet fired.
    pub pending_scroll: bool,
    /// Pane size seen by the last render, used to clamp scrolling.
    pub viewport: Viewport,

    pub tokens: RequestTokens,
    pub lifecycle: Lifecycle,
    pub notice: Option<Notice>,

    /// Directory exported documents are written to.
    pub export_dir: String,
    pub theme: Theme,
}

impl AppState {
    /// Creates an empty workflow with the given theme and export directory.
    #[must_use]
    pub fn new(theme: Theme, export_dir: impl Into<String>) -> Self {
        Self {
            search: SearchState::default(),
            query_input: String::new(),
            selection: SelectionSet::new(),
            topic: String::new(),
            generation: GenerationState::default(),
            analysis: AnalysisState::default(),
            focus: Focus::default(),
            results_cursor: 0,
            selection_cursor: 0,
            anchor: Anchor::default(),
            page_offset: 0,
            pending_scroll: false,
            viewport: Viewport::default(),
            tokens: RequestTokens::default(),
            lifecycle: Lifecycle::default(),
            notice: None,
            export_dir: export_dir.into(),
            theme,
        }
    }

    /// Whether late asynchronous writes are still welcome.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// Starts a search for `query`.
    ///
    /// Blank queries are ignored and leave the search state untouched.
    /// Otherwise the region goes in-flight, prior results and error are
    /// cleared, and a new token supersedes any search still outstanding.
    pub fn submit_search(&mut self, query: &str) -> Option<Action> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("ignoring blank search query");
            return None;
        }

        let token = self.tokens.next_search();
        self.search.query = query.to_string();
        self.search.status = SearchStatus::InFlight;
        self.search.results.clear();
        self.search.error_message = None;
        self.results_cursor = 0;

        tracing::debug!(query = %query, token = token, "search submitted");
        Some(Action::Search {
            token,
            query: query.to_string(),
        })
    }

    /// Applies a search completion. Returns `false` when it was discarded.
    pub fn complete_search(&mut self, token: u64, outcome: Result<Vec<Paper>, String>) -> bool {
        if !self.is_active() {
            tracing::debug!(token = token, "search completed after teardown, dropping");
            return false;
        }
        if token != self.tokens.search {
            tracing::debug!(token = token, latest = self.tokens.search, "stale search response, dropping");
            return false;
        }

        match outcome {
            Ok(papers) if papers.is_empty() => {
                self.search.status = SearchStatus::NoResults;
                self.search.results.clear();
                self.search.error_message = Some(NO_RESULTS_MESSAGE.to_string());
                self.pending_scroll = true;
            }
            Ok(papers) => {
                tracing::debug!(count = papers.len(), "search succeeded");
                self.search.status = SearchStatus::Succeeded;
                self.search.results = papers;
                self.search.error_message = None;
                self.pending_scroll = true;
            }
            Err(detail) => {
                tracing::warn!(error = %detail, "search failed");
                self.search.status = SearchStatus::Failed;
                self.search.results.clear();
                self.search.error_message = Some(SEARCH_FAILED_MESSAGE.to_string());
            }
        }
        self.results_cursor = 0;
        true
    }

    /// Adds a paper to the selection; no-op if its id is already selected.
    pub fn add_paper(&mut self, paper: Paper) -> bool {
        let added = self.selection.add(paper);
        if added {
            tracing::debug!(selected = self.selection.len(), "paper added to selection");
        }
        added
    }

    /// Removes the paper with `id` from the selection; no-op if absent.
    pub fn remove_paper(&mut self, id: &str) -> bool {
        let removed = self.selection.remove(id);
        if removed {
            self.selection_cursor = self
                .selection_cursor
                .min(self.selection.len().saturating_sub(1));
        }
        removed
    }

    /// Whether the generate action can currently be invoked.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        !self.selection.is_empty() && !self.topic.trim().is_empty() && !self.generation.generating
    }

    /// Starts hypothesis generation for the current selection and topic.
    ///
    /// Does nothing while a generation is already in flight. If the selection
    /// is empty or the topic blank, records the validation message instead of
    /// issuing a request.
    pub fn generate(&mut self) -> Option<Action> {
        if self.generation.generating {
            tracing::debug!("generation already in flight");
            return None;
        }

        let topic = self.topic.trim();
        if self.selection.is_empty() || topic.is_empty() {
            self.generation.error = Some(GENERATION_GUARD_MESSAGE.to_string());
            return None;
        }

        let request = GenerationRequest {
            paper_ids: self.selection.ids(),
            topic: topic.to_string(),
        };
        let token = self.tokens.next_generate();
        self.generation.generating = true;
        self.generation.error = None;
        self.generation.result = None;

        tracing::debug!(token = token, papers = request.paper_ids.len(), "generation requested");
        Some(Action::Generate { token, request })
    }

    /// Applies a generation completion. Returns `false` when it was discarded.
    pub fn complete_generation(&mut self, token: u64, outcome: Result<GenerationResult, String>) -> bool {
        if !self.is_active() || token != self.tokens.generate {
            tracing::debug!(token = token, latest = self.tokens.generate, "dropping generation response");
            return false;
        }

        self.generation.generating = false;
        match outcome {
            Ok(result) => {
                self.generation.result = Some(result);
                self.generation.error = None;
                self.anchor = Anchor::Hypothesis;
                self.page_offset = 0;
            }
            Err(detail) => {
                tracing::warn!(error = %detail, "hypothesis generation failed");
                self.generation.result = None;
                self.generation.error = Some(GENERATION_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Requests a literature analysis of the current selection.
    ///
    /// Guarded exactly like [`generate`](Self::generate); the validation
    /// message is shown under the generate button.
    pub fn request_analysis(&mut self, kind: AnalysisKind) -> Option<Action> {
        let topic = self.topic.trim();
        if self.selection.is_empty() || topic.is_empty() {
            self.generation.error = Some(GENERATION_GUARD_MESSAGE.to_string());
            return None;
        }

        let request = AnalysisRequest {
            paper_ids: self.selection.ids(),
            topic: topic.to_string(),
            kind,
        };
        let token = self.tokens.next_analysis();
        self.analysis.pending = Some(PendingAnalysis {
            kind,
            title: topic.to_string(),
        });
        self.analysis.error = None;

        tracing::debug!(token = token, kind = %kind, "analysis requested");
        Some(Action::Analyze { token, request })
    }

    /// Applies an analysis completion, opening the viewer on success.
    pub fn complete_analysis(&mut self, token: u64, outcome: Result<String, String>) -> bool {
        if !self.is_active() || token != self.tokens.analysis {
            tracing::debug!(token = token, latest = self.tokens.analysis, "dropping analysis response");
            return false;
        }
        let Some(pending) = self.analysis.pending.take() else {
            return false;
        };

        match outcome {
            Ok(body) => {
                self.analysis.payload = Some(DisplayPayload::new(pending.title, body, pending.kind));
                self.analysis.visible = true;
                self.analysis.scroll = 0;
                self.analysis.error = None;
            }
            Err(detail) => {
                tracing::warn!(error = %detail, kind = %pending.kind, "analysis failed");
                self.analysis.error = Some(ANALYSIS_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Fires the deferred post-search scroll, if one is armed.
    pub fn apply_pending_scroll(&mut self) -> bool {
        if !self.is_active() || !self.pending_scroll {
            return false;
        }
        self.pending_scroll = false;
        self.anchor = Anchor::PaperSelection;
        self.page_offset = 0;
        true
    }

    /// Paper under the results cursor.
    #[must_use]
    pub fn highlighted_result(&self) -> Option<&Paper> {
        self.search.results.get(self.results_cursor)
    }

    /// Paper under the selection cursor.
    #[must_use]
    pub fn highlighted_selection(&self) -> Option<&Paper> {
        self.selection.get(self.selection_cursor)
    }

    /// Moves the cursor of the focused list, wrapping at both ends.
    pub fn move_cursor(&mut self, down: bool) -> bool {
        let (cursor, len) = match self.focus {
            Focus::Results => (&mut self.results_cursor, self.search.results.len()),
            Focus::Selection => (&mut self.selection_cursor, self.selection.len()),
            Focus::Query | Focus::Topic => return false,
        };
        if len == 0 {
            return false;
        }
        *cursor = if down {
            (*cursor + 1) % len
        } else if *cursor == 0 {
            len - 1
        } else {
            *cursor - 1
        };
        true
    }

    /// Text buffer of the focused input field, if the focus is on one.
    pub fn focused_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Query => Some(&mut self.query_input),
            Focus::Topic => Some(&mut self.topic),
            Focus::Results | Focus::Selection => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(Theme::default(), "/tmp")
    }

    fn paper(id: &str) -> Paper {
        Paper::new(id, format!("Paper {id}"), vec!["Author".to_string()], "2021-05-01")
    }

    #[test]
    fn blank_query_leaves_state_unchanged() {
        let mut s = state();
        let before = s.search.clone();
        for query in ["", "   ", "\t\n"] {
            assert!(s.submit_search(query).is_none());
        }
        assert_eq!(s.search, before);
        assert_eq!(s.tokens.search, 0);
    }

    #[test]
    fn submit_clears_previous_outcome() {
        let mut s = state();
        s.submit_search("x");
        s.complete_search(1, Err("boom".into()));
        assert!(s.search.error_message.is_some());

        s.submit_search("y");
        assert_eq!(s.search.status, SearchStatus::InFlight);
        assert!(s.search.error_message.is_none());
        assert!(s.search.results.is_empty());
    }

    #[test]
    fn successful_search_keeps_order_and_arms_scroll() {
        let mut s = state();
        s.submit_search("transformers");
        let papers = vec![paper("b"), paper("a"), paper("c")];
        assert!(s.complete_search(1, Ok(papers.clone())));
        assert_eq!(s.search.status, SearchStatus::Succeeded);
        assert_eq!(s.search.results, papers);
        assert!(s.search.error_message.is_none());
        assert!(s.pending_scroll);
    }

    #[test]
    fn empty_search_is_soft_failure() {
        let mut s = state();
        s.submit_search("nothing");
        s.complete_search(1, Ok(vec![]));
        assert_eq!(s.search.status, SearchStatus::NoResults);
        assert_eq!(s.search.error_message.as_deref(), Some(NO_RESULTS_MESSAGE));
        assert!(s.search.results.is_empty());
    }

    #[test]
    fn failed_search_uses_fixed_message() {
        let mut s = state();
        s.submit_search("q");
        s.complete_search(1, Err("connection refused".into()));
        assert_eq!(s.search.status, SearchStatus::Failed);
        assert_eq!(s.search.error_message.as_deref(), Some(SEARCH_FAILED_MESSAGE));
        assert!(!s.pending_scroll);
    }

    #[test]
    fn stale_search_response_is_discarded() {
        let mut s = state();
        s.submit_search("first");
        s.submit_search("second");
        assert!(!s.complete_search(1, Ok(vec![paper("old")])));
        assert_eq!(s.search.status, SearchStatus::InFlight);

        assert!(s.complete_search(2, Ok(vec![paper("new")])));
        assert_eq!(s.search.results[0].id, "new");
    }

    #[test]
    fn completions_after_teardown_are_ignored() {
        let mut s = state();
        s.submit_search("q");
        s.lifecycle = Lifecycle::TornDown;
        assert!(!s.complete_search(1, Ok(vec![paper("a")])));
        assert_eq!(s.search.status, SearchStatus::InFlight);

        s.pending_scroll = true;
        assert!(!s.apply_pending_scroll());
        assert_eq!(s.anchor, Anchor::Top);
    }

    #[test]
    fn generate_is_guarded() {
        let mut s = state();
        assert!(s.generate().is_none());
        assert_eq!(s.generation.error.as_deref(), Some(GENERATION_GUARD_MESSAGE));

        s.add_paper(paper("a"));
        s.topic = "   ".into();
        assert!(s.generate().is_none());

        s.selection = SelectionSet::new();
        s.topic = "topic".into();
        assert!(s.generate().is_none());
        assert_eq!(s.tokens.generate, 0);
    }

    #[test]
    fn generate_sends_selection_ids_and_trimmed_topic() {
        let mut s = state();
        s.add_paper(paper("a"));
        s.add_paper(paper("b"));
        s.topic = "  Multimodal Learning ".into();
        let action = s.generate().unwrap();
        assert_eq!(
            action,
            Action::Generate {
                token: 1,
                request: GenerationRequest {
                    paper_ids: vec!["a".into(), "b".into()],
                    topic: "Multimodal Learning".into(),
                },
            }
        );
        assert!(s.generation.generating);
        assert!(!s.can_generate());
        assert!(s.generate().is_none());
    }

    #[test]
    fn failed_generation_clears_result_and_reenables() {
        let mut s = state();
        s.add_paper(paper("a"));
        s.topic = "t".into();
        s.generate();
        s.complete_generation(1, Ok(GenerationResult::new("first")));
        assert!(s.generation.result.is_some());

        s.generate();
        assert!(s.generation.result.is_none());
        s.complete_generation(2, Err("500".into()));
        assert!(!s.generation.generating);
        assert!(s.generation.result.is_none());
        assert_eq!(s.generation.error.as_deref(), Some(GENERATION_FAILED_MESSAGE));
        assert!(s.can_generate());
    }

    #[test]
    fn successful_generation_anchors_page_at_hypothesis() {
        let mut s = state();
        s.add_paper(paper("a"));
        s.topic = "t".into();
        s.page_offset = 4;
        s.generate();
        s.complete_generation(1, Ok(GenerationResult::new("## H")));
        assert_eq!(s.anchor, Anchor::Hypothesis);
        assert_eq!(s.page_offset, 0);

        s.anchor = Anchor::Top;
        s.generate();
        s.complete_generation(2, Err("500".into()));
        assert_eq!(s.anchor, Anchor::Top);
    }

    #[test]
    fn analysis_opens_viewer_with_topic_title() {
        let mut s = state();
        s.add_paper(paper("a"));
        s.topic = "Deep Learning Ethics".into();
        let Some(Action::Analyze { token, request }) = s.request_analysis(AnalysisKind::Gaps) else {
            panic!("expected analyze action");
        };
        assert_eq!(request.kind, AnalysisKind::Gaps);
        assert!(s.complete_analysis(token, Ok("# Gaps".into())));
        assert!(s.analysis.visible);
        let payload = s.analysis.payload.as_ref().unwrap();
        assert_eq!(payload.export_filename(), "gaps-deep-learning-ethics.md");
    }

    #[test]
    fn analysis_failure_keeps_viewer_closed() {
        let mut s = state();
        s.add_paper(paper("a"));
        s.topic = "t".into();
        s.request_analysis(AnalysisKind::Survey);
        s.complete_analysis(1, Err("timeout".into()));
        assert!(!s.analysis.visible);
        assert_eq!(s.analysis.error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    }

    #[test]
    fn cursor_wraps_in_focused_list() {
        let mut s = state();
        s.search.results = vec![paper("a"), paper("b")];
        s.focus = Focus::Results;
        assert!(s.move_cursor(false));
        assert_eq!(s.results_cursor, 1);
        assert!(s.move_cursor(true));
        assert_eq!(s.results_cursor, 0);

        s.focus = Focus::Query;
        assert!(!s.move_cursor(true));
    }

    #[test]
    fn removing_last_selected_clamps_cursor() {
        let mut s = state();
        s.add_paper(paper("a"));
        s.add_paper(paper("b"));
        s.selection_cursor = 1;
        s.remove_paper("b");
        assert_eq!(s.selection_cursor, 0);
    }
}
