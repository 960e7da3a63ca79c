//! Outbound request construction for the research service.
//!
//! The plugin cannot block on network I/O, so requests are described here as
//! plain data ([`HttpRequest`]) and handed to the Zellij host, which answers
//! later with a `WebRequestResult` event. Every request carries a
//! [`RequestContext`] in the host's context map so the answer can be routed
//! back to the action (and request token) that produced it.

use crate::domain::error::Result;
use crate::domain::{AnalysisRequest, GenerationRequest};
use std::collections::BTreeMap;

const CONTEXT_KIND_KEY: &str = "hypothesizer_request";
const CONTEXT_TOKEN_KEY: &str = "hypothesizer_token";

/// HTTP method subset used by the research service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

/// The three outbound actions, each with its own token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Search,
    Generate,
    Analysis,
}

impl RequestKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Generate => "generate",
            Self::Analysis => "analysis",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "search" => Some(Self::Search),
            "generate" => Some(Self::Generate),
            "analysis" => Some(Self::Analysis),
            _ => None,
        }
    }
}

/// Routing information echoed back by the host with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub kind: RequestKind,
    pub token: u64,
}

impl RequestContext {
    #[must_use]
    pub const fn new(kind: RequestKind, token: u64) -> Self {
        Self { kind, token }
    }

    /// Encodes the context into the string map Zellij carries alongside a request.
    #[must_use]
    pub fn to_map(self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(CONTEXT_KIND_KEY.to_string(), self.kind.as_str().to_string());
        map.insert(CONTEXT_TOKEN_KEY.to_string(), self.token.to_string());
        map
    }

    /// Decodes a context map; `None` for responses this plugin did not originate.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Option<Self> {
        let kind = RequestKind::parse(map.get(CONTEXT_KIND_KEY)?)?;
        let token = map.get(CONTEXT_TOKEN_KEY)?.parse().ok()?;
        Some(Self { kind, token })
    }
}

/// A fully described web request, ready for `zellij_tile::web_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub verb: Verb,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    pub context: BTreeMap<String, String>,
}

/// Builds requests against a configured service base URL.
///
/// # Examples
///
/// ```
/// use hypothesizer::api::{ApiClient, Verb};
///
/// let client = ApiClient::new("http://localhost:8000/api/");
/// let request = client.search_request(1, "graph neural nets");
/// assert_eq!(request.verb, Verb::Get);
/// assert_eq!(request.url, "http://localhost:8000/api/papers/search?query=graph%20neural%20nets");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// `GET {base}/papers/search?query=...`
    #[must_use]
    pub fn search_request(&self, token: u64, query: &str) -> HttpRequest {
        let url = format!(
            "{}/papers/search?query={}",
            self.base_url,
            urlencoding::encode(query.trim())
        );
        tracing::debug!(url = %url, token = token, "built search request");

        HttpRequest {
            url,
            verb: Verb::Get,
            headers: Self::headers(false),
            body: Vec::new(),
            context: RequestContext::new(RequestKind::Search, token).to_map(),
        }
    }

    /// `POST {base}/hypothesis` with `{"paper_ids": [...], "topic": "..."}`.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the request body cannot be serialized.
    pub fn generate_request(&self, token: u64, request: &GenerationRequest) -> Result<HttpRequest> {
        let body = serde_json::to_vec(request)?;
        Ok(HttpRequest {
            url: format!("{}/hypothesis", self.base_url),
            verb: Verb::Post,
            headers: Self::headers(true),
            body,
            context: RequestContext::new(RequestKind::Generate, token).to_map(),
        })
    }

    /// `POST {base}/analysis` with paper ids, topic and `analysis_type`.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the request body cannot be serialized.
    pub fn analysis_request(&self, token: u64, request: &AnalysisRequest) -> Result<HttpRequest> {
        let body = serde_json::to_vec(request)?;
        Ok(HttpRequest {
            url: format!("{}/analysis", self.base_url),
            verb: Verb::Post,
            headers: Self::headers(true),
            body,
            context: RequestContext::new(RequestKind::Analysis, token).to_map(),
        })
    }

    fn headers(with_body: bool) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if with_body {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnalysisKind;

    #[test]
    fn context_round_trips_through_map() {
        let ctx = RequestContext::new(RequestKind::Analysis, 42);
        assert_eq!(RequestContext::from_map(&ctx.to_map()), Some(ctx));
    }

    #[test]
    fn foreign_context_is_ignored() {
        let mut map = BTreeMap::new();
        map.insert("other_plugin".to_string(), "x".to_string());
        assert_eq!(RequestContext::from_map(&map), None);

        let mut bad_token = RequestContext::new(RequestKind::Search, 1).to_map();
        bad_token.insert(CONTEXT_TOKEN_KEY.to_string(), "not-a-number".to_string());
        assert_eq!(RequestContext::from_map(&bad_token), None);
    }

    #[test]
    fn generate_request_serializes_ids_in_order() {
        let client = ApiClient::new("http://svc");
        let request = GenerationRequest {
            paper_ids: vec!["b".into(), "a".into()],
            topic: "Multimodal Learning".into(),
        };
        let http = client.generate_request(7, &request).unwrap();
        assert_eq!(http.url, "http://svc/hypothesis");
        assert_eq!(http.verb, Verb::Post);
        let body: serde_json::Value = serde_json::from_slice(&http.body).unwrap();
        assert_eq!(body["paper_ids"], serde_json::json!(["b", "a"]));
        assert_eq!(body["topic"], "Multimodal Learning");
        assert_eq!(http.headers.get("Content-Type").map(String::as_str), Some("application/json"));
    }

    #[test]
    fn analysis_request_targets_analysis_endpoint() {
        let client = ApiClient::new("http://svc/api");
        let request = AnalysisRequest {
            paper_ids: vec!["a".into()],
            topic: "t".into(),
            kind: AnalysisKind::Trends,
        };
        let http = client.analysis_request(3, &request).unwrap();
        assert_eq!(http.url, "http://svc/api/analysis");
        let ctx = RequestContext::from_map(&http.context).unwrap();
        assert_eq!(ctx, RequestContext::new(RequestKind::Analysis, 3));
    }

    #[test]
    fn search_query_is_trimmed_and_encoded() {
        let client = ApiClient::new("http://svc");
        let http = client.search_request(1, "  a&b ");
        assert_eq!(http.url, "http://svc/papers/search?query=a%26b");
        assert!(http.body.is_empty());
    }
}
