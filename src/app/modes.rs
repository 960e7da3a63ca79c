//! Focus, lifecycle and page-anchor state types.
//!
//! These enums decide how key presses are interpreted and which part of the
//! page is scrolled into view.
//!
//! # Focus Cycle
//!
//! ```text
//! Query → Results → Selection → Topic → Query …   (Tab / Shift+Tab)
//! ```
//!
//! `Query` and `Topic` are text fields: printable keys edit them. `Results` and
//! `Selection` are lists: printable keys are commands (`j`/`k`, `a`, `d`).

/// Region of the page receiving key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Search query input.
    #[default]
    Query,
    /// Search results list.
    Results,
    /// Selected papers list.
    Selection,
    /// Research topic input.
    Topic,
}

impl Focus {
    /// Next region in the Tab cycle.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Query => Self::Results,
            Self::Results => Self::Selection,
            Self::Selection => Self::Topic,
            Self::Topic => Self::Query,
        }
    }

    /// Previous region in the Tab cycle.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Query => Self::Topic,
            Self::Results => Self::Query,
            Self::Selection => Self::Results,
            Self::Topic => Self::Selection,
        }
    }

    /// Whether printable keys edit text in this region.
    #[must_use]
    pub const fn is_text_input(self) -> bool {
        matches!(self, Self::Query | Self::Topic)
    }
}

/// Whether the view may still accept asynchronous state writes.
///
/// Once the plugin is about to close, late service responses and timers are
/// dropped instead of being applied to a view nobody will see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Active,
    TornDown,
}

/// Section the page viewport is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    /// Top of the page.
    #[default]
    Top,
    /// "1. Select Papers" section, scrolled to after a search completes.
    PaperSelection,
    /// "3. Generated Hypothesis & Validation" section.
    Hypothesis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycle_is_closed() {
        let mut focus = Focus::Query;
        for _ in 0..4 {
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Query);
        assert_eq!(Focus::Query.prev().next(), Focus::Query);
    }

    #[test]
    fn only_query_and_topic_take_text() {
        assert!(Focus::Query.is_text_input());
        assert!(Focus::Topic.is_text_input());
        assert!(!Focus::Results.is_text_input());
        assert!(!Focus::Selection.is_text_input());
    }
}
