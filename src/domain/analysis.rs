//! Literature analysis payloads and markdown export.
//!
//! A [`DisplayPayload`] is what the analysis viewer shows: a title, a markdown
//! body and the [`AnalysisKind`] that picks the heading and icon. Exporting a
//! payload produces an [`ExportFile`] whose name is derived from the kind and a
//! slug of the title.

use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME type attached to exported documents.
pub const MARKDOWN_MIME: &str = "text/markdown";

/// The flavour of literature analysis requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Survey,
    Gaps,
    Trends,
}

impl AnalysisKind {
    /// Wire and filename form: `survey`, `gaps` or `trends`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Survey => "survey",
            Self::Gaps => "gaps",
            Self::Trends => "trends",
        }
    }

    /// Heading shown at the top of the viewer.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Survey => "Literature Survey",
            Self::Gaps => "Research Gaps Analysis",
            Self::Trends => "Research Trends Analysis",
        }
    }

    /// Icon drawn next to the heading (book, magnifier, chart).
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Survey => "📖",
            Self::Gaps => "🔍",
            Self::Trends => "📈",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only content handed to the analysis viewer by its controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    pub title: String,
    pub body: String,
    pub kind: AnalysisKind,
}

impl DisplayPayload {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, kind: AnalysisKind) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind,
        }
    }

    /// Filename used when exporting: `{kind}-{slug}.md`.
    #[must_use]
    pub fn export_filename(&self) -> String {
        format!("{}-{}.md", self.kind, slugify(&self.title))
    }

    /// Serializes the body into a markdown file ready for the export sink.
    ///
    /// # Examples
    ///
    /// ```
    /// use hypothesizer::domain::{AnalysisKind, DisplayPayload};
    ///
    /// let payload = DisplayPayload::new("Deep Learning Ethics", "# Hi", AnalysisKind::Gaps);
    /// let file = payload.export();
    /// assert_eq!(file.filename, "gaps-deep-learning-ethics.md");
    /// assert_eq!(file.bytes, b"# Hi");
    /// assert_eq!(file.mime_type, "text/markdown");
    /// ```
    #[must_use]
    pub fn export(&self) -> ExportFile {
        ExportFile {
            bytes: self.body.as_bytes().to_vec(),
            mime_type: MARKDOWN_MIME.to_string(),
            filename: self.export_filename(),
        }
    }
}

/// A document handed to the file sink: raw bytes, their MIME type and a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

/// Lower-cases a title into a filename-safe slug.
///
/// Every run of whitespace, path separators or other characters that are
/// reserved in file names (`: * ? " < > |` and control characters) becomes a
/// single hyphen. Leading and trailing runs become hyphens too, matching a
/// plain `/\s+/g` replacement; callers normally pass trimmed titles.
///
/// # Examples
///
/// ```
/// use hypothesizer::domain::slugify;
///
/// assert_eq!(slugify("Deep Learning Ethics"), "deep-learning-ethics");
/// assert_eq!(slugify("Graph \t  Neural\nNets"), "graph-neural-nets");
/// assert_eq!(slugify("AI/ML in Healthcare"), "ai-ml-in-healthcare");
/// ```
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_gap = false;

    for c in title.chars() {
        if is_separator(c) {
            if !in_gap {
                slug.push('-');
                in_gap = true;
            }
        } else {
            slug.extend(c.to_lowercase());
            in_gap = false;
        }
    }

    slug
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_and_icons_follow_kind() {
        assert_eq!(AnalysisKind::Survey.heading(), "Literature Survey");
        assert_eq!(AnalysisKind::Gaps.heading(), "Research Gaps Analysis");
        assert_eq!(AnalysisKind::Trends.heading(), "Research Trends Analysis");
        assert_ne!(AnalysisKind::Gaps.icon(), AnalysisKind::Trends.icon());
    }

    #[test]
    fn export_round_trips_body() {
        let payload = DisplayPayload::new("Deep Learning Ethics", "# Hi", AnalysisKind::Gaps);
        let file = payload.export();
        assert_eq!(file.filename, "gaps-deep-learning-ethics.md");
        assert_eq!(String::from_utf8(file.bytes).unwrap(), payload.body);
    }

    #[test]
    fn export_of_empty_body_is_empty_file() {
        let file = DisplayPayload::new("Empty", "", AnalysisKind::Survey).export();
        assert!(file.bytes.is_empty());
        assert_eq!(file.filename, "survey-empty.md");
    }

    #[test]
    fn slug_collapses_mixed_whitespace_runs() {
        assert_eq!(slugify("A  \t B"), "a-b");
        assert_eq!(slugify(" Padded "), "-padded-");
        assert_eq!(slugify("ÉTUDE Ça"), "étude-ça");
    }

    #[test]
    fn slug_replaces_path_reserved_characters() {
        assert_eq!(slugify("AI/ML in Healthcare"), "ai-ml-in-healthcare");
        assert_eq!(slugify(r"C:\Data / Sets"), "c-data-sets");
        assert_eq!(slugify("What? <Why> \"Now\" | *"), "what-why-now-");
        let file = DisplayPayload::new("AI/ML in Healthcare", "# Survey", AnalysisKind::Survey).export();
        assert_eq!(file.filename, "survey-ai-ml-in-healthcare.md");
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AnalysisKind::Trends).unwrap(), "\"trends\"");
    }
}
