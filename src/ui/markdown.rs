//! Markdown to styled terminal lines.
//!
//! Walks `pulldown-cmark` events and flattens block structure into
//! [`StyledLine`]s wrapped to a fixed width. Inline emphasis is dropped; links
//! keep their target in parentheses. Anything the parser accepts renders, so
//! empty or malformed text simply produces fewer lines.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

/// Narrowest width text is wrapped to, regardless of the caller's width.
const MIN_WRAP_WIDTH: usize = 10;

/// Block-level style of one rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Heading with its level (1-6).
    Heading(u8),
    Paragraph,
    ListItem,
    Code,
    Quote,
    Rule,
    Blank,
}

/// One terminal row of rendered markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub text: String,
    pub style: LineStyle,
}

impl StyledLine {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), LineStyle::Blank)
    }
}

/// Renders `text` as markdown wrapped to `width` display columns.
///
/// # Example
///
/// ```rust
/// use hypothesizer::ui::markdown::{render_markdown, LineStyle};
///
/// let lines = render_markdown("# Findings\n\nAttention helps.", 40);
/// assert_eq!(lines[0].style, LineStyle::Heading(1));
/// assert_eq!(lines.last().unwrap().text, "Attention helps.");
/// ```
#[must_use]
pub fn render_markdown(text: &str, width: usize) -> Vec<StyledLine> {
    let mut state = RenderState::new(width);
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    for event in Parser::new_ext(text, options) {
        state.handle_event(event);
    }
    state.finish();
    state.lines
}

#[derive(Clone, Copy)]
struct ListState {
    ordered: bool,
    index: u64,
}

struct ItemContext {
    buf: String,
    depth: usize,
    prefix: String,
}

struct RenderState {
    width: usize,
    buf: String,
    heading: Option<u8>,
    quote_depth: usize,
    in_code: bool,
    code_buf: String,
    list_stack: Vec<ListState>,
    item_stack: Vec<ItemContext>,
    pending_link: Option<String>,
    lines: Vec<StyledLine>,
}

impl RenderState {
    fn new(width: usize) -> Self {
        Self {
            width: width.max(MIN_WRAP_WIDTH),
            buf: String::new(),
            heading: None,
            quote_depth: 0,
            in_code: false,
            code_buf: String::new(),
            list_stack: Vec::new(),
            item_stack: Vec::new(),
            pending_link: None,
            lines: Vec::new(),
        }
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.handle_start(tag),
            Event::End(tag) => self.handle_end(tag),
            Event::Text(t) => self.append(&t),
            Event::Code(t) => self.append(&format!("`{t}`")),
            Event::Html(t) | Event::InlineHtml(t) => self.append(&t),
            Event::TaskListMarker(checked) => self.append(if checked { "[x] " } else { "[ ] " }),
            Event::SoftBreak => self.append(" "),
            Event::HardBreak => self.append("\n"),
            Event::Rule => {
                self.separate();
                let rule = "─".repeat(self.width);
                self.lines.push(StyledLine::new(rule, LineStyle::Rule));
            }
            _ => {}
        }
    }

    fn handle_start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => self.heading = Some(level as u8),
            Tag::BlockQuote { .. } => self.quote_depth += 1,
            Tag::CodeBlock(_) => {
                // Text already gathered for an enclosing item goes above the code.
                self.flush_item_text();
                self.in_code = true;
                self.code_buf.clear();
            }
            Tag::List(start) => self.start_list(start),
            Tag::Item => self.start_item(),
            Tag::Link { dest_url, .. } => self.pending_link = Some(dest_url.to_string()),
            _ => {}
        }
    }

    fn handle_end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.item_stack.is_empty() {
                    self.flush_paragraph();
                }
            }
            TagEnd::Heading(_) => self.flush_heading(),
            TagEnd::BlockQuote { .. } => {
                self.flush_paragraph();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => self.flush_code(),
            TagEnd::List(_) => {
                self.list_stack.pop();
            }
            TagEnd::Item => self.end_item(),
            TagEnd::Link => {
                if let Some(url) = self.pending_link.take() {
                    self.append(&format!(" ({url})"));
                }
            }
            _ => {}
        }
    }

    fn finish(&mut self) {
        while !self.item_stack.is_empty() {
            self.end_item();
        }
        self.flush_paragraph();
        if !self.code_buf.is_empty() {
            self.flush_code();
        }
    }

    fn append(&mut self, text: &str) {
        if self.in_code {
            self.code_buf.push_str(text);
        } else if let Some(item) = self.item_stack.last_mut() {
            item.buf.push_str(text);
        } else {
            self.buf.push_str(text);
        }
    }

    /// Inserts a blank row between top-level blocks.
    fn separate(&mut self) {
        let nested = !self.item_stack.is_empty();
        let after_blank = self.lines.last().map_or(true, |l| l.style == LineStyle::Blank);
        if !nested && !after_blank {
            self.lines.push(StyledLine::blank());
        }
    }

    fn flush_paragraph(&mut self) {
        let text = std::mem::take(&mut self.buf);
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.separate();
        if self.quote_depth > 0 {
            let bar = "│ ".repeat(self.quote_depth);
            self.push_wrapped(text, &bar, &bar, LineStyle::Quote);
        } else {
            self.push_wrapped(text, "", "", LineStyle::Paragraph);
        }
    }

    fn flush_heading(&mut self) {
        let Some(level) = self.heading.take() else {
            return;
        };
        let text = std::mem::take(&mut self.buf);
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.separate();
        self.push_wrapped(text, "", "", LineStyle::Heading(level));
    }

    fn flush_code(&mut self) {
        self.in_code = false;
        let code = std::mem::take(&mut self.code_buf);
        self.separate();
        for line in code.trim_end_matches('\n').lines() {
            self.lines.push(StyledLine::new(format!("  {line}"), LineStyle::Code));
        }
    }

    fn start_list(&mut self, start: Option<u64>) {
        if self.item_stack.is_empty() {
            self.flush_paragraph();
            self.separate();
        } else {
            self.flush_item_text();
        }
        self.list_stack.push(ListState {
            ordered: start.is_some(),
            index: start.unwrap_or(1),
        });
    }

    fn start_item(&mut self) {
        let depth = self.list_stack.len();
        let Some(list) = self.list_stack.last_mut() else {
            return;
        };
        let prefix = if list.ordered {
            let prefix = format!("{}. ", list.index);
            list.index = list.index.saturating_add(1);
            prefix
        } else {
            "• ".to_string()
        };
        self.item_stack.push(ItemContext {
            buf: String::new(),
            depth,
            prefix,
        });
    }

    fn end_item(&mut self) {
        self.flush_item_text();
        self.item_stack.pop();
    }

    /// Emits the text gathered so far for the innermost item. The bullet is
    /// printed once; text after a nested list continues under it.
    fn flush_item_text(&mut self) {
        let Some(item) = self.item_stack.last_mut() else {
            return;
        };
        let text = std::mem::take(&mut item.buf);
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let indent = "  ".repeat(item.depth.saturating_sub(1));
        let first = format!("{indent}{}", item.prefix);
        let rest = " ".repeat(UnicodeWidthStr::width(first.as_str()));
        item.prefix = " ".repeat(UnicodeWidthStr::width(item.prefix.as_str()));
        self.push_wrapped(text, &first, &rest, LineStyle::ListItem);
    }

    fn push_wrapped(&mut self, text: &str, first: &str, rest: &str, style: LineStyle) {
        let indent = UnicodeWidthStr::width(first).max(UnicodeWidthStr::width(rest));
        let available = self.width.saturating_sub(indent).max(1);
        for (idx, line) in wrap(text, available).into_iter().enumerate() {
            let lead = if idx == 0 { first } else { rest };
            self.lines.push(StyledLine::new(format!("{lead}{line}"), style));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[StyledLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render_markdown("", 80).is_empty());
        assert!(render_markdown("   \n\n", 80).is_empty());
    }

    #[test]
    fn malformed_input_does_not_panic() {
        for text in ["**unclosed", "[link](", "```\nno fence end", "> > >", "1.\n-\n*", "#"] {
            let _ = render_markdown(text, 5);
        }
    }

    #[test]
    fn headings_and_paragraphs_are_separated() {
        let lines = render_markdown("## Gaps\nFew datasets.", 40);
        assert_eq!(texts(&lines), vec!["Gaps", "", "Few datasets."]);
        assert_eq!(lines[0].style, LineStyle::Heading(2));
        assert_eq!(lines[2].style, LineStyle::Paragraph);
    }

    #[test]
    fn lists_get_markers() {
        let lines = render_markdown("- one\n- two\n\n1. first\n2. second", 40);
        assert_eq!(texts(&lines), vec!["• one", "• two", "", "1. first", "2. second"]);
        assert!(lines
            .iter()
            .filter(|l| l.style != LineStyle::Blank)
            .all(|l| l.style == LineStyle::ListItem));
    }

    #[test]
    fn nested_lists_are_indented() {
        let lines = render_markdown("- outer\n  - inner", 40);
        assert_eq!(texts(&lines), vec!["• outer", "  • inner"]);
    }

    #[test]
    fn long_paragraphs_wrap_to_width() {
        let text = "attention ".repeat(20);
        let lines = render_markdown(&text, 24);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| UnicodeWidthStr::width(l.text.as_str()) <= 24));
    }

    #[test]
    fn code_blocks_keep_their_lines() {
        let lines = render_markdown("```\nlet a = 1;\nlet b = 2;\n```", 40);
        assert_eq!(texts(&lines), vec!["  let a = 1;", "  let b = 2;"]);
        assert!(lines.iter().all(|l| l.style == LineStyle::Code));
    }

    #[test]
    fn code_inside_item_follows_item_text() {
        let lines = render_markdown("- install\n  ```\n  pip install x\n  ```\n- run", 40);
        assert_eq!(texts(&lines), vec!["• install", "  pip install x", "• run"]);
        assert_eq!(lines[0].style, LineStyle::ListItem);
        assert_eq!(lines[1].style, LineStyle::Code);
    }

    #[test]
    fn quotes_and_links() {
        let lines = render_markdown("> see [paper](https://x.org)", 60);
        assert_eq!(lines[0].style, LineStyle::Quote);
        assert_eq!(lines[0].text, "│ see paper (https://x.org)");
    }

    #[test]
    fn rule_spans_width() {
        let lines = render_markdown("a\n\n---\n\nb", 12);
        let rule = lines.iter().find(|l| l.style == LineStyle::Rule).unwrap();
        assert_eq!(rule.text.chars().count(), 12);
    }
}
