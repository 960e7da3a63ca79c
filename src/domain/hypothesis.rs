//! Generation and analysis request/result types.
//!
//! These are the payloads exchanged with the research service. Requests are
//! built from the current selection and topic; results are decoded from the
//! service's JSON responses.

use super::AnalysisKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input to the hypothesis generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub paper_ids: Vec<String>,
    pub topic: String,
}

/// Output of the hypothesis generation service.
///
/// `hypothesis` is markdown. Any other fields the service returns (scores,
/// validation narrative, citations) are kept verbatim in `validation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub hypothesis: String,
    #[serde(flatten)]
    pub validation: Map<String, Value>,
}

impl GenerationResult {
    #[must_use]
    pub fn new(hypothesis: impl Into<String>) -> Self {
        Self {
            hypothesis: hypothesis.into(),
            validation: Map::new(),
        }
    }
}

/// Input to the literature analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub paper_ids: Vec<String>,
    pub topic: String,
    #[serde(rename = "analysis_type")]
    pub kind: AnalysisKind,
}

/// Output of the literature analysis service.
///
/// Older service builds answer with a `survey` field instead of `content`; both
/// land in the single `content` field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(alias = "survey")]
    pub content: String,
}
