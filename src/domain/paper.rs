//! Paper domain model.
//!
//! A [`Paper`] is the bibliographic record returned by the search service. Papers
//! are immutable once fetched and compared by identifier only, so the same record
//! appearing in two searches is still the same paper.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A bibliographic record returned by the search service.
///
/// The wire format uses `publishedDate`; everything else maps one to one.
/// `authors` defaults to empty because the service omits it for some records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(rename = "publishedDate", default)]
    pub published_date: String,
}

impl Paper {
    /// Creates a paper from its parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use hypothesizer::domain::Paper;
    ///
    /// let paper = Paper::new("p1", "Attention Is All You Need", vec!["Vaswani".into()], "2017-06-12");
    /// assert_eq!(paper.year(), Some(2017));
    /// ```
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        authors: Vec<String>,
        published_date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors,
            published_date: published_date.into(),
        }
    }

    /// Extracts the publication year from `published_date`.
    ///
    /// Accepts RFC 3339 timestamps, `YYYY-MM-DD`, `YYYY-MM` and a bare `YYYY`.
    /// Returns `None` when the date cannot be interpreted.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        let raw = self.published_date.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.year());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date.year());
        }

        // "2021-03" and "2021" have no day component for chrono to hang onto.
        let head = raw.split('-').next().unwrap_or(raw);
        if head.len() == 4 {
            return head.parse().ok();
        }
        None
    }

    /// Returns the "authors • year" caption rendered under the title.
    ///
    /// The year is omitted when it cannot be extracted.
    ///
    /// # Examples
    ///
    /// ```
    /// use hypothesizer::domain::Paper;
    ///
    /// let paper = Paper::new("p1", "T", vec!["Ada".into(), "Grace".into()], "1985-01-01");
    /// assert_eq!(paper.caption(), "Ada, Grace • 1985");
    /// ```
    #[must_use]
    pub fn caption(&self) -> String {
        let authors = self.authors.join(", ");
        match self.year() {
            Some(year) => format!("{authors} • {year}"),
            None => authors,
        }
    }
}
