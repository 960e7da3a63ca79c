//! View model types representing renderable UI state.
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer. They hold display-ready data only: the page is already cut to
//! the visible window and markdown is already wrapped to the pane width.
//!
//! # Example
//!
//! ```rust
//! use hypothesizer::ui::viewmodel::{PageLine, Tone};
//!
//! let line = PageLine::Text { text: "No papers selected.".to_string(), tone: Tone::Dim };
//! assert!(matches!(line, PageLine::Text { tone: Tone::Dim, .. }));
//! ```

use crate::ui::markdown::StyledLine;

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Visible slice of the workflow page, one entry per terminal row.
    pub page: Vec<PageLine>,

    /// Page scroll position, for the scroll indicator.
    pub page_scroll: ScrollInfo,

    /// Transient message shown above the footer.
    pub notice: Option<NoticeInfo>,

    /// Analysis viewer drawn over the page when open.
    pub overlay: Option<AnalysisOverlay>,

    pub footer: FooterInfo,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
}

/// Footer keybinding hints for the current focus.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    pub keybindings: String,
}

/// Color role of a plain text row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Dim,
    Error,
}

/// State of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Enabled,
    Disabled,
    /// Request in flight; rendered with a spinner glyph.
    Busy,
}

/// One terminal row of the workflow page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageLine {
    Blank,
    /// Numbered section title ("2. Enter Research Topic").
    SectionTitle(String),
    /// Sub-heading inside a section ("Selected Papers (2)").
    Subheading(String),
    Text { text: String, tone: Tone },
    Input(InputInfo),
    /// Title row of a paper entry.
    Paper(PaperRow),
    /// "authors • year" row under a paper title.
    Caption { text: String, is_cursor: bool },
    Button { label: String, state: ButtonState },
    /// Rendered hypothesis markdown.
    Markdown(StyledLine),
}

/// Single-line text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputInfo {
    pub label: String,
    pub value: String,
    /// Shown dimmed while `value` is empty.
    pub placeholder: String,
    pub focused: bool,
}

/// Leading glyph of a paper row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMarker {
    /// Search result that can be added.
    Add,
    /// Search result already in the selection.
    Added,
    /// Selected paper that can be removed.
    Remove,
}

impl RowMarker {
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Added => "✓",
            Self::Remove => "✗",
        }
    }
}

/// Title row of a search result or selected paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRow {
    pub marker: RowMarker,
    pub title: String,
    /// Character ranges of the title matching the last query.
    ///
    /// Each tuple is `(start_index, end_index)` in character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
    /// Row is under the focused list's cursor.
    pub is_cursor: bool,
    /// Row cannot be acted on (already selected).
    pub is_disabled: bool,
}

/// Position within a scrollable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollInfo {
    /// First visible line.
    pub offset: usize,
    /// Number of visible lines.
    pub visible: usize,
    /// Total number of lines.
    pub total: usize,
}

impl ScrollInfo {
    /// Largest valid offset.
    #[must_use]
    pub const fn max_offset(&self) -> usize {
        self.total.saturating_sub(self.visible)
    }

    #[must_use]
    pub const fn can_scroll(&self) -> bool {
        self.total > self.visible
    }
}

/// Transient notice line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeInfo {
    pub text: String,
    pub is_error: bool,
}

/// Analysis viewer overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOverlay {
    pub icon: &'static str,
    pub heading: &'static str,
    /// Research topic the analysis was generated for.
    pub title: String,
    /// Visible slice of the rendered body.
    pub body: Vec<StyledLine>,
    pub scroll: ScrollInfo,
    /// Name the export action will write.
    pub export_filename: String,
    pub frame: Frame,
}

/// Screen rectangle, 1-indexed like the cursor escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}
