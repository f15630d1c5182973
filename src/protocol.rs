//! JSON request dispatch.
//!
//! Requests are tagged by `type`:
//!
//! ```json
//! {"type": "sync", "manifests": [...]}
//! {"type": "search", "query": "regex", "searchProperties": ["docs"], "useLinkAnalysis": true}
//! {"type": "stats"}
//! ```
//!
//! Every request yields exactly one [`Response`]; failures are reported as
//! [`Response::Error`] and never affect the published generation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coordinator::{GenerationStats, IndexCoordinator, SearchResponse};
use crate::document::Manifest;
use crate::error::{FathomError, Result};
use crate::query::SearchScope;

/// A request understood by [`SearchService`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    Sync {
        manifests: Vec<Manifest>,
    },
    Search {
        query: String,
        #[serde(default, rename = "searchProperties")]
        search_properties: Vec<String>,
        #[serde(default, rename = "useLinkAnalysis")]
        use_link_analysis: bool,
    },
    Stats,
}

impl Request {
    fn is_known_type(name: &str) -> bool {
        matches!(name, "sync" | "search" | "stats")
    }
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    StillIndexing,
    QueryTooLong,
    DictionaryLoadFailure,
    UnknownRequest,
    InvalidManifest,
    InvalidCorrelation,
    MalformedRequest,
    Internal,
}

impl From<&FathomError> for ErrorKind {
    fn from(error: &FathomError) -> Self {
        match error {
            FathomError::StillIndexing => ErrorKind::StillIndexing,
            FathomError::QueryTooLong { .. } => ErrorKind::QueryTooLong,
            FathomError::DictionaryLoadFailure(_) => ErrorKind::DictionaryLoadFailure,
            FathomError::UnknownRequest(_) => ErrorKind::UnknownRequest,
            FathomError::InvalidManifest(_) => ErrorKind::InvalidManifest,
            FathomError::InvalidCorrelation(_) => ErrorKind::InvalidCorrelation,
            FathomError::Json(_) => ErrorKind::MalformedRequest,
            _ => ErrorKind::Internal,
        }
    }
}

/// The reply to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Response {
    Synced { generation: u64 },
    Results(SearchResponse),
    Stats { stats: Option<GenerationStats> },
    Error {
        kind: ErrorKind,
        message: String,
        retryable: bool,
    },
}

impl Response {
    pub fn error(error: &FathomError) -> Self {
        Response::Error {
            kind: ErrorKind::from(error),
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

impl From<Result<Response>> for Response {
    fn from(result: Result<Response>) -> Self {
        result.unwrap_or_else(|e| Response::error(&e))
    }
}

/// Dispatches requests to an [`IndexCoordinator`].
#[derive(Debug, Clone)]
pub struct SearchService {
    coordinator: Arc<IndexCoordinator>,
}

impl SearchService {
    pub fn new(coordinator: Arc<IndexCoordinator>) -> Self {
        SearchService { coordinator }
    }

    pub fn coordinator(&self) -> &Arc<IndexCoordinator> {
        &self.coordinator
    }

    /// Handle a typed request.
    ///
    /// A `sync` returns once the generation is published; its spelling model
    /// keeps building in the background.
    pub fn handle(&self, request: Request) -> Response {
        let result = match request {
            Request::Sync { manifests } => self
                .coordinator
                .sync(&manifests)
                .map(|task| Response::Synced {
                    generation: task.generation(),
                }),
            Request::Search {
                query,
                search_properties,
                use_link_analysis,
            } => {
                let scope = SearchScope::from_properties(&search_properties);
                self.coordinator
                    .search(&query, &scope, use_link_analysis)
                    .map(Response::Results)
            }
            Request::Stats => Ok(Response::Stats {
                stats: self.coordinator.stats(),
            }),
        };
        Response::from(result)
    }

    /// Handle an untyped JSON request.
    ///
    /// A missing or unrecognised `type` is an `UnknownRequest`; a known type
    /// with bad fields is a malformed request.
    pub fn handle_json(&self, value: Value) -> Response {
        let Some(kind) = value.get("type").and_then(Value::as_str) else {
            return Response::error(&FathomError::unknown_request("request has no \"type\""));
        };
        if !Request::is_known_type(kind) {
            return Response::error(&FathomError::unknown_request(format!(
                "unsupported request type '{kind}'"
            )));
        }

        match serde_json::from_value::<Request>(value) {
            Ok(request) => self.handle(request),
            Err(e) => Response::error(&FathomError::from(e)),
        }
    }

    /// Handle one line of JSON text.
    pub fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Value>(line) {
            Ok(value) => self.handle_json(value),
            Err(e) => Response::error(&FathomError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FathomConfig;
    use crate::spelling::provider::StaticDictionary;
    use serde_json::json;

    fn service() -> SearchService {
        let coordinator =
            IndexCoordinator::new(FathomConfig::default(), Arc::new(StaticDictionary::empty())).unwrap();
        SearchService::new(Arc::new(coordinator))
    }

    fn sync_request() -> Value {
        json!({
            "type": "sync",
            "manifests": [{
                "searchProperty": "docs",
                "includeInGlobalSearch": true,
                "documents": [
                    {"title": "Regex Guide", "url": "u/regex", "text": "patterns", "preview": "Regex"}
                ]
            }]
        })
    }

    #[test]
    fn test_unknown_request_type() {
        let service = service();
        match service.handle_json(json!({"type": "delete"})) {
            Response::Error { kind, .. } => assert_eq!(kind, ErrorKind::UnknownRequest),
            other => panic!("unexpected response: {other:?}"),
        }
        match service.handle_json(json!({"query": "regex"})) {
            Response::Error { kind, .. } => assert_eq!(kind, ErrorKind::UnknownRequest),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_known_request() {
        let service = service();
        match service.handle_json(json!({"type": "search"})) {
            Response::Error { kind, .. } => assert_eq!(kind, ErrorKind::MalformedRequest),
            other => panic!("unexpected response: {other:?}"),
        }
        assert!(service.handle_line("{not json").is_error());
    }

    #[test]
    fn test_search_before_sync_reports_still_indexing() {
        let service = service();
        let response = service.handle_json(json!({"type": "search", "query": "regex"}));
        match response {
            Response::Error { kind, retryable, .. } => {
                assert_eq!(kind, ErrorKind::StillIndexing);
                assert!(retryable);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn test_sync_then_search() {
        let service = service();
        assert_eq!(
            service.handle_json(sync_request()),
            Response::Synced { generation: 1 }
        );

        let response = service.handle_json(json!({
            "type": "search",
            "query": "regex",
            "searchProperties": ["docs"],
            "useLinkAnalysis": true
        }));
        let Response::Results(results) = response else {
            panic!("expected results");
        };
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.results[0].url, "u/regex");
    }

    #[test]
    fn test_response_wire_format() {
        let service = service();
        service.handle_json(sync_request());

        let response = service.handle_line(r#"{"type":"search","query":"regex"}"#);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "results");
        assert_eq!(value["results"][0]["title"], "Regex Guide");
        assert!(value["spellingCorrections"].as_object().unwrap().is_empty());

        let error = Response::error(&FathomError::QueryTooLong { terms: 11, max: 10 });
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["kind"], "queryTooLong");
        assert_eq!(value["retryable"], false);
    }

    #[test]
    fn test_stats_request() {
        let service = service();
        assert_eq!(
            service.handle(Request::Stats),
            Response::Stats { stats: None }
        );

        service.handle_json(sync_request());
        let Response::Stats { stats: Some(stats) } = service.handle(Request::Stats) else {
            panic!("expected stats");
        };
        assert_eq!(stats.generation, 1);
        assert_eq!(stats.documents, 1);
    }
}
