//! Inbound response decoding for the research service.
//!
//! Turns a host `WebRequestResult` (status, body, context) into an application
//! [`Event`]. Transport failures, non-2xx statuses and malformed bodies all
//! collapse into the same failure outcome; the detail survives only as a log
//! string.

use super::request::{RequestContext, RequestKind};
use crate::app::Event;
use crate::domain::error::{HypothesizerError, Result};
use crate::domain::{AnalysisResult, GenerationResult, Paper};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Longest slice of an error body kept for logging.
const MAX_ERROR_BODY: usize = 256;

/// Search responses arrive either as a bare array or wrapped in `{"papers": []}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchBody {
    Bare(Vec<Paper>),
    Wrapped { papers: Vec<Paper> },
}

fn ensure_success(status: u16, body: &[u8]) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let text = String::from_utf8_lossy(body);
    let message: String = text.chars().take(MAX_ERROR_BODY).collect();
    Err(HypothesizerError::Service { status, message })
}

/// Decodes a search response.
///
/// An empty array is a valid answer, not an error.
///
/// # Errors
///
/// Returns a service error for non-2xx statuses and a decode error for bodies
/// that are not a paper list.
pub fn parse_search(status: u16, body: &[u8]) -> Result<Vec<Paper>> {
    ensure_success(status, body)?;
    let parsed: SearchBody = serde_json::from_slice(body)?;
    Ok(match parsed {
        SearchBody::Bare(papers) | SearchBody::Wrapped { papers } => papers,
    })
}

/// Decodes a hypothesis generation response.
///
/// # Errors
///
/// Returns a service error for non-2xx statuses and a decode error for
/// malformed bodies.
pub fn parse_generation(status: u16, body: &[u8]) -> Result<GenerationResult> {
    ensure_success(status, body)?;
    Ok(serde_json::from_slice(body)?)
}

/// Decodes a literature analysis response.
///
/// # Errors
///
/// Returns a service error for non-2xx statuses and a decode error for
/// malformed bodies.
pub fn parse_analysis(status: u16, body: &[u8]) -> Result<AnalysisResult> {
    ensure_success(status, body)?;
    Ok(serde_json::from_slice(body)?)
}

/// Maps a web request result to the completion event for the originating action.
///
/// Returns `None` for responses whose context this plugin did not create.
#[must_use]
pub fn completion_event(status: u16, body: &[u8], context: &BTreeMap<String, String>) -> Option<Event> {
    let Some(ctx) = RequestContext::from_map(context) else {
        tracing::debug!(status = status, "web response without hypothesizer context");
        return None;
    };

    tracing::debug!(
        kind = ?ctx.kind,
        token = ctx.token,
        status = status,
        body_len = body.len(),
        "decoding service response"
    );

    let event = match ctx.kind {
        RequestKind::Search => Event::SearchCompleted {
            token: ctx.token,
            outcome: parse_search(status, body).map_err(|e| e.to_string()),
        },
        RequestKind::Generate => Event::GenerationCompleted {
            token: ctx.token,
            outcome: parse_generation(status, body).map_err(|e| e.to_string()),
        },
        RequestKind::Analysis => Event::AnalysisCompleted {
            token: ctx.token,
            outcome: parse_analysis(status, body).map(|r| r.content).map_err(|e| e.to_string()),
        },
    };

    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_accepts_bare_and_wrapped_lists() {
        let bare = br#"[{"id":"1","title":"A","authors":[],"publishedDate":"2020"}]"#;
        let wrapped = br#"{"papers":[{"id":"1","title":"A","authors":[],"publishedDate":"2020"}]}"#;
        assert_eq!(parse_search(200, bare).unwrap().len(), 1);
        assert_eq!(parse_search(200, wrapped).unwrap().len(), 1);
    }

    #[test]
    fn empty_search_is_not_an_error() {
        assert!(parse_search(200, b"[]").unwrap().is_empty());
    }

    #[test]
    fn non_success_status_is_service_error() {
        let err = parse_search(500, b"boom").unwrap_err();
        assert!(matches!(err, HypothesizerError::Service { status: 500, .. }));
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = parse_generation(200, b"<html>").unwrap_err();
        assert!(matches!(err, HypothesizerError::Decode(_)));
    }

    #[test]
    fn completion_event_routes_by_context() {
        let context = RequestContext::new(RequestKind::Generate, 9).to_map();
        let event = completion_event(200, br#"{"hypothesis":"H"}"#, &context).unwrap();
        match event {
            Event::GenerationCompleted { token, outcome } => {
                assert_eq!(token, 9);
                assert_eq!(outcome.unwrap().hypothesis, "H");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn completion_event_ignores_foreign_context() {
        assert!(completion_event(200, b"[]", &BTreeMap::new()).is_none());
    }

    #[test]
    fn analysis_failure_carries_detail() {
        let context = RequestContext::new(RequestKind::Analysis, 1).to_map();
        let event = completion_event(503, b"unavailable", &context).unwrap();
        let Event::AnalysisCompleted { outcome, .. } = event else {
            panic!("expected analysis completion");
        };
        assert!(outcome.unwrap_err().contains("503"));
    }
}
