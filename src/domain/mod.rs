//! Domain layer for the Hypothesizer plugin.
//!
//! Core types independent of Zellij APIs and of the wire protocol: papers, the
//! selection set, generation/analysis payloads and the error type.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`paper`]: Bibliographic record returned by search
//! - [`selection`]: Insertion-ordered, id-keyed selection set
//! - [`hypothesis`]: Generation and analysis requests/results
//! - [`analysis`]: Viewer payload, slugs and markdown export
//!
//! # Examples
//!
//! ```
//! use hypothesizer::domain::{Paper, SelectionSet};
//!
//! let mut selection = SelectionSet::new();
//! selection.add(Paper::new("p1", "Title", vec!["Author".into()], "2024-01-01"));
//! assert_eq!(selection.ids(), vec!["p1".to_string()]);
//! ```

pub mod analysis;
pub mod error;
pub mod hypothesis;
pub mod paper;
pub mod selection;

pub use analysis::{slugify, AnalysisKind, DisplayPayload, ExportFile, MARKDOWN_MIME};
pub use error::{HypothesizerError, Result};
pub use hypothesis::{AnalysisRequest, AnalysisResult, GenerationRequest, GenerationResult};
pub use paper::Paper;
pub use selection::SelectionSet;
