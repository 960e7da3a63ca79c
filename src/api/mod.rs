//! Request/response contract with the remote research service.
//!
//! # Modules
//!
//! - [`request`]: Builds search, generation and analysis requests as plain data
//!   tagged with a routing context (action kind + request token)
//! - [`response`]: Decodes host responses into application events
//!
//! The plugin shim turns an [`HttpRequest`] into a `web_request` host call and
//! feeds `WebRequestResult` events through [`completion_event`].

pub mod request;
pub mod response;

pub use request::{ApiClient, HttpRequest, RequestContext, RequestKind, Verb};
pub use response::{completion_event, parse_analysis, parse_generation, parse_search};
