//! Insertion-ordered selection of papers keyed by id.

use super::Paper;

/// The user-curated set of papers used as input to generation.
///
/// Holds at most one paper per id and preserves the order papers were added in.
/// Only [`add`](Self::add) and [`remove`](Self::remove) mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    papers: Vec<Paper>,
}

impl SelectionSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { papers: Vec::new() }
    }

    /// Adds a paper unless one with the same id is already present.
    ///
    /// Returns `true` if the selection changed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hypothesizer::domain::{Paper, SelectionSet};
    ///
    /// let mut selection = SelectionSet::new();
    /// let paper = Paper::new("p1", "T", vec![], "2020");
    /// assert!(selection.add(paper.clone()));
    /// assert!(!selection.add(paper));
    /// assert_eq!(selection.len(), 1);
    /// ```
    pub fn add(&mut self, paper: Paper) -> bool {
        if self.contains(&paper.id) {
            return false;
        }
        self.papers.push(paper);
        true
    }

    /// Removes the paper with the given id, if present.
    ///
    /// Returns `true` if the selection changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.papers.len();
        self.papers.retain(|p| p.id != id);
        self.papers.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.papers.iter().any(|p| p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Paper> {
        self.papers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Paper> {
        self.papers.iter()
    }

    /// Paper ids in insertion order, as sent to the generation service.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.papers.iter().map(|p| p.id.clone()).collect()
    }
}
