//! View model computation and scroll bookkeeping for [`AppState`].
//!
//! The whole workflow page is laid out as one list of rows, then windowed by
//! the current [`Anchor`] plus the manual `page_offset`. The analysis viewer is
//! laid out separately into a centered frame with its own scroll position.

use super::modes::{Anchor, Focus};
use super::state::{AppState, SearchStatus};
use crate::domain::Paper;
use crate::ui::markdown::{render_markdown, StyledLine};
use crate::ui::viewmodel::{
    AnalysisOverlay, ButtonState, FooterInfo, Frame, HeaderInfo, InputInfo, NoticeInfo, PageLine,
    PaperRow, RowMarker, ScrollInfo, Tone, UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashMap;

pub const PAGE_TITLE: &str = "Hypothesis Generation & Validation";

/// Rows taken by the blank top line, header, borders, notice and footer.
const PAGE_CHROME_ROWS: usize = 7;
/// Columns of left/right margin around page content.
const PAGE_MARGIN: usize = 2;
/// Gap between the screen edge and the viewer frame.
const OVERLAY_MARGIN: usize = 2;
/// Frame rows around the viewer body: borders, heading, title, separators, actions.
const OVERLAY_CHROME_ROWS: usize = 7;
const MIN_OVERLAY_WIDTH: usize = 24;

/// Pane dimensions seen by the most recent render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub rows: usize,
    pub cols: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { rows: 24, cols: 80 }
    }
}

/// Full, unwindowed page.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub lines: Vec<PageLine>,
    anchors: HashMap<Anchor, usize>,
    /// Row of the focused list's cursor, if a list has focus.
    cursor_line: Option<usize>,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            anchors: HashMap::from([(Anchor::Top, 0)]),
            cursor_line: None,
        }
    }

    fn push(&mut self, line: PageLine) {
        self.lines.push(line);
    }

    fn mark(&mut self, anchor: Anchor) {
        self.anchors.insert(anchor, self.lines.len());
    }

    /// Row an anchor points at; anchors missing from the page fall back to the top.
    #[must_use]
    pub fn anchor_line(&self, anchor: Anchor) -> usize {
        self.anchors.get(&anchor).copied().unwrap_or(0)
    }
}

impl AppState {
    /// Records the pane size reported by the host.
    pub fn set_viewport(&mut self, rows: usize, cols: usize) {
        self.viewport = Viewport { rows, cols };
    }

    /// Lays out the full workflow page for a pane `cols` wide.
    #[must_use]
    pub fn page_layout(&self, cols: usize) -> PageLayout {
        let width = cols.saturating_sub(PAGE_MARGIN * 2);
        let mut layout = PageLayout::new();

        layout.mark(Anchor::PaperSelection);
        layout.push(PageLine::SectionTitle("1. Select Papers".to_string()));
        self.layout_selection(&mut layout);
        layout.push(PageLine::Blank);
        self.layout_search(&mut layout);
        layout.push(PageLine::Blank);

        layout.push(PageLine::SectionTitle("2. Enter Research Topic".to_string()));
        self.layout_generation(&mut layout);

        if let Some(result) = &self.generation.result {
            layout.push(PageLine::Blank);
            layout.mark(Anchor::Hypothesis);
            layout.push(PageLine::SectionTitle("3. Generated Hypothesis & Validation".to_string()));
            for line in render_markdown(&result.hypothesis, width) {
                layout.push(PageLine::Markdown(line));
            }
        }

        layout
    }

    fn layout_selection(&self, layout: &mut PageLayout) {
        layout.push(PageLine::Subheading(format!("Selected Papers ({})", self.selection.len())));
        if self.selection.is_empty() {
            layout.push(PageLine::Text {
                text: "No papers selected. Search and add papers below.".to_string(),
                tone: Tone::Dim,
            });
            return;
        }

        for (idx, paper) in self.selection.iter().enumerate() {
            let is_cursor = self.focus == Focus::Selection && idx == self.selection_cursor;
            if is_cursor {
                layout.cursor_line = Some(layout.lines.len());
            }
            layout.push(PageLine::Paper(PaperRow {
                marker: RowMarker::Remove,
                title: paper.title.clone(),
                highlight_ranges: vec![],
                is_cursor,
                is_disabled: false,
            }));
            layout.push(PageLine::Caption {
                text: paper.caption(),
                is_cursor,
            });
        }
    }

    fn layout_search(&self, layout: &mut PageLayout) {
        layout.push(PageLine::Subheading("Search for Papers".to_string()));
        layout.push(PageLine::Input(InputInfo {
            label: "Query".to_string(),
            value: self.query_input.clone(),
            placeholder: "Search for papers for hypothesis generation...".to_string(),
            focused: self.focus == Focus::Query,
        }));

        if self.search.status == SearchStatus::InFlight {
            layout.push(PageLine::Text {
                text: "Searching...".to_string(),
                tone: Tone::Dim,
            });
        }
        if let Some(message) = &self.search.error_message {
            layout.push(PageLine::Text {
                text: format!("! {message}"),
                tone: Tone::Error,
            });
        }
        if self.search.results.is_empty() {
            return;
        }

        layout.push(PageLine::Subheading("Search Results".to_string()));
        let matcher = SkimMatcherV2::default();
        for (idx, paper) in self.search.results.iter().enumerate() {
            let is_cursor = self.focus == Focus::Results && idx == self.results_cursor;
            if is_cursor {
                layout.cursor_line = Some(layout.lines.len());
            }
            layout.push(PageLine::Paper(self.result_row(paper, is_cursor, &matcher)));
            layout.push(PageLine::Caption {
                text: paper.caption(),
                is_cursor,
            });
        }
    }

    fn result_row(&self, paper: &Paper, is_cursor: bool, matcher: &SkimMatcherV2) -> PaperRow {
        let selected = self.selection.contains(&paper.id);
        PaperRow {
            marker: if selected { RowMarker::Added } else { RowMarker::Add },
            title: paper.title.clone(),
            highlight_ranges: highlight_ranges(&paper.title, &self.search.query, matcher),
            is_cursor,
            is_disabled: selected,
        }
    }

    fn layout_generation(&self, layout: &mut PageLayout) {
        layout.push(PageLine::Input(InputInfo {
            label: "Topic".to_string(),
            value: self.topic.clone(),
            placeholder: "e.g., Multimodal Learning in Healthcare".to_string(),
            focused: self.focus == Focus::Topic,
        }));

        let state = if self.generation.generating {
            ButtonState::Busy
        } else if self.can_generate() {
            ButtonState::Enabled
        } else {
            ButtonState::Disabled
        };
        layout.push(PageLine::Button {
            label: "Generate Hypothesis".to_string(),
            state,
        });

        if let Some(error) = &self.generation.error {
            layout.push(PageLine::Text {
                text: error.clone(),
                tone: Tone::Error,
            });
        }
        if let Some(pending) = &self.analysis.pending {
            layout.push(PageLine::Text {
                text: format!("{} Generating {}...", pending.kind.icon(), pending.kind.heading()),
                tone: Tone::Dim,
            });
        }
        if let Some(error) = &self.analysis.error {
            layout.push(PageLine::Text {
                text: error.clone(),
                tone: Tone::Error,
            });
        }
    }

    fn page_window(&self, layout: &PageLayout, rows: usize) -> ScrollInfo {
        let visible = rows.saturating_sub(PAGE_CHROME_ROWS).max(1);
        let total = layout.lines.len();
        let max = total.saturating_sub(visible);
        let start = i64::try_from(layout.anchor_line(self.anchor)).unwrap_or(0) + i64::from(self.page_offset);
        let offset = usize::try_from(start.max(0)).unwrap_or(0).min(max);
        ScrollInfo { offset, visible, total }
    }

    fn set_page_start(&mut self, layout: &PageLayout, start: usize) {
        let anchor = layout.anchor_line(self.anchor);
        let delta = i64::try_from(start).unwrap_or(i64::MAX) - i64::try_from(anchor).unwrap_or(0);
        self.page_offset = i32::try_from(delta).unwrap_or(0);
    }

    /// Scrolls the page by `delta` rows, clamped to the content.
    pub fn scroll_page(&mut self, delta: i32) -> bool {
        let Viewport { rows, cols } = self.viewport;
        let layout = self.page_layout(cols);
        let window = self.page_window(&layout, rows);
        let target = i64::try_from(window.offset).unwrap_or(0) + i64::from(delta);
        let target = usize::try_from(target.max(0)).unwrap_or(0).min(window.max_offset());
        if target == window.offset {
            return false;
        }
        self.set_page_start(&layout, target);
        true
    }

    /// Scrolls just enough to bring the focused list's cursor (title and
    /// caption rows) into view.
    pub fn reveal_cursor(&mut self) -> bool {
        let Viewport { rows, cols } = self.viewport;
        let layout = self.page_layout(cols);
        let Some(line) = layout.cursor_line else {
            return false;
        };
        let window = self.page_window(&layout, rows);
        let target = if line < window.offset {
            line
        } else if line + 2 > window.offset + window.visible {
            (line + 2).saturating_sub(window.visible)
        } else {
            return false;
        };
        self.set_page_start(&layout, target.min(window.max_offset()));
        true
    }

    /// Rendered body of the open analysis, wrapped to the viewer width.
    fn overlay_body(&self, cols: usize) -> Vec<StyledLine> {
        let Some(payload) = &self.analysis.payload else {
            return vec![];
        };
        let frame_width = overlay_width(cols);
        render_markdown(&payload.body, frame_width.saturating_sub(4))
    }

    fn overlay_scroll(&self, rows: usize, total: usize) -> ScrollInfo {
        let visible = rows.saturating_sub(OVERLAY_MARGIN * 2 + OVERLAY_CHROME_ROWS).max(1);
        let max = total.saturating_sub(visible);
        ScrollInfo {
            offset: self.analysis.scroll.min(max),
            visible,
            total,
        }
    }

    /// Scrolls the viewer body by `delta` rows, clamped to the content.
    pub fn scroll_viewer(&mut self, delta: i32) -> bool {
        if !self.analysis.visible {
            return false;
        }
        let Viewport { rows, cols } = self.viewport;
        let total = self.overlay_body(cols).len();
        let scroll = self.overlay_scroll(rows, total);
        let target = i64::try_from(scroll.offset).unwrap_or(0) + i64::from(delta);
        let target = usize::try_from(target.max(0)).unwrap_or(0).min(scroll.max_offset());
        if target == self.analysis.scroll {
            return false;
        }
        self.analysis.scroll = target;
        true
    }

    fn compute_overlay(&self, rows: usize, cols: usize) -> Option<AnalysisOverlay> {
        if !self.analysis.visible {
            return None;
        }
        let payload = self.analysis.payload.as_ref()?;

        let body = self.overlay_body(cols);
        let scroll = self.overlay_scroll(rows, body.len());
        let end = (scroll.offset + scroll.visible).min(body.len());
        let width = overlay_width(cols);

        Some(AnalysisOverlay {
            icon: payload.kind.icon(),
            heading: payload.kind.heading(),
            title: payload.title.clone(),
            body: body[scroll.offset..end].to_vec(),
            scroll,
            export_filename: payload.export_filename(),
            frame: Frame {
                row: OVERLAY_MARGIN + 1,
                col: cols.saturating_sub(width) / 2 + 1,
                width,
                height: scroll.visible + OVERLAY_CHROME_ROWS,
            },
        })
    }

    /// Computes a renderable view model for a pane of `rows` × `cols`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hypothesizer::app::AppState;
    /// use hypothesizer::ui::Theme;
    ///
    /// let state = AppState::new(Theme::default(), "/host");
    /// let vm = state.compute_viewmodel(24, 80);
    /// assert!(vm.overlay.is_none());
    /// ```
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let layout = self.page_layout(cols);
        let page_scroll = self.page_window(&layout, rows);
        let end = (page_scroll.offset + page_scroll.visible).min(layout.lines.len());

        UIViewModel {
            header: HeaderInfo {
                title: PAGE_TITLE.to_string(),
            },
            page: layout.lines[page_scroll.offset..end].to_vec(),
            page_scroll,
            notice: self.notice.as_ref().map(|n| NoticeInfo {
                text: n.text.clone(),
                is_error: n.is_error,
            }),
            overlay: self.compute_overlay(rows, cols),
            footer: self.compute_footer(),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = if self.analysis.visible {
            "Esc/q: close | e: export | j/k: scroll | PgUp/PgDn: page"
        } else {
            match self.focus {
                Focus::Query => "Enter: search | Tab: next | ^g: generate | ^s/^r/^t: survey/gaps/trends | Esc: hide",
                Focus::Results => "j/k: move | Enter/a: add | Tab: next | ^g: generate | Esc: hide",
                Focus::Selection => "j/k: move | d: remove | Tab: next | ^g: generate | Esc: hide",
                Focus::Topic => "Enter: generate | Tab: next | ^s/^r/^t: survey/gaps/trends | Esc: hide",
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

const fn overlay_width(cols: usize) -> usize {
    let width = cols.saturating_sub(OVERLAY_MARGIN * 2);
    if width < MIN_OVERLAY_WIDTH {
        MIN_OVERLAY_WIDTH
    } else {
        width
    }
}

/// Coalesces fuzzy match indices into `(start, end)` character ranges.
fn highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    if query.is_empty() {
        return vec![];
    }
    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}
