//! Index coordinator: rebuilds, publication and query answering.
//!
//! A `sync` builds a complete [`Generation`] off to the side and publishes it
//! with a single atomic pointer swap. Searches load the current generation
//! once and answer entirely from that snapshot, so they never observe a
//! half-built index and never wait on a rebuild.
//!
//! Correlation edges live outside any generation. Each search reads the
//! table registered at that moment, so an edge added after a `sync` applies
//! to the very next query without a rebuild.
//!
//! Spelling models are built after publication on the tokio blocking pool.
//! Each model is attached to the generation it was built from; a search that
//! arrives before the model is attached simply gets no corrections.

pub mod generation;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::{ArcSwap, ArcSwapOption};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::config::{FathomConfig, SpellingConfig};
use crate::document::Manifest;
use crate::error::{FathomError, Result};
use crate::index::correlation::{CorrelationEdge, CorrelationTable};
use crate::query::{QueryParser, SearchScope};
use crate::spelling::model::SpellingModel;
use crate::spelling::provider::DictionaryProvider;

pub use generation::{Generation, GenerationStats};

/// Map a raw relevance score onto [0, 1).
///
/// A single title hit (10.0) maps to about 0.91, a lone body-text hit (1.0)
/// to 0.5.
pub fn reported_score(raw: f64) -> f64 {
    if raw <= 0.0 { 0.0 } else { raw / (raw + 1.0) }
}

/// Whether a generation has been published yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum IndexState {
    NotReady,
    Ready { generation: u64 },
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub preview: String,
    pub url: String,
    /// Reported relevance in [0, 1); not part of the wire format.
    #[serde(skip_serializing, default)]
    pub score: f64,
}

/// Results of one search plus any spelling corrections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub spelling_corrections: BTreeMap<String, String>,
}

enum TaskState {
    Running(JoinHandle<Result<()>>),
    Done(Result<()>),
}

/// Completion handle for the spelling model of one generation.
///
/// Dropping the handle does not cancel the build.
pub struct SpellingTask {
    generation: u64,
    state: TaskState,
}

impl SpellingTask {
    /// The generation whose model this task builds.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            TaskState::Running(handle) => handle.is_finished(),
            TaskState::Done(_) => true,
        }
    }

    /// Wait until the model is attached, or the dictionary failed to load.
    pub async fn wait(self) -> Result<()> {
        match self.state {
            TaskState::Running(handle) => handle
                .await
                .map_err(|e| FathomError::other(format!("spelling build task failed: {e}")))?,
            TaskState::Done(outcome) => outcome,
        }
    }
}

impl std::fmt::Debug for SpellingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellingTask")
            .field("generation", &self.generation)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Owns the published generation and answers `sync` and `search`.
pub struct IndexCoordinator {
    config: FathomConfig,
    analyzer: Arc<dyn Analyzer>,
    parser: QueryParser,
    dictionary: Arc<dyn DictionaryProvider>,
    correlations: ArcSwap<CorrelationTable>,
    correlation_writes: Mutex<()>,
    current: ArcSwapOption<Generation>,
    next_generation: AtomicU64,
}

impl IndexCoordinator {
    /// Create a coordinator using the standard analyzer.
    pub fn new(config: FathomConfig, dictionary: Arc<dyn DictionaryProvider>) -> Result<Self> {
        Self::with_analyzer(config, dictionary, Arc::new(StandardAnalyzer::new()))
    }

    /// Create a coordinator with a custom analyzer, shared by indexing and
    /// query parsing.
    pub fn with_analyzer(
        config: FathomConfig,
        dictionary: Arc<dyn DictionaryProvider>,
        analyzer: Arc<dyn Analyzer>,
    ) -> Result<Self> {
        config.validate()?;
        let parser = QueryParser::new(analyzer.clone()).with_max_terms(config.max_query_terms);

        Ok(IndexCoordinator {
            config,
            analyzer,
            parser,
            dictionary,
            correlations: ArcSwap::from_pointee(CorrelationTable::new()),
            correlation_writes: Mutex::new(()),
            current: ArcSwapOption::empty(),
            next_generation: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &FathomConfig {
        &self.config
    }

    /// Register a correlation; it applies to every later search.
    pub fn correlate_word(
        &self,
        term: &str,
        correlated: &str,
        weight: f64,
        directional: bool,
    ) -> Result<()> {
        self.update_correlations(|table| table.correlate_word(term, correlated, weight, directional))
    }

    /// Register configured edges. Nothing is registered if any edge is invalid.
    pub fn correlate_edges(&self, edges: &[CorrelationEdge]) -> Result<()> {
        self.update_correlations(|table| table.add_edges(edges))
    }

    /// The correlation table searches currently use.
    pub fn correlations(&self) -> Arc<CorrelationTable> {
        self.correlations.load_full()
    }

    fn update_correlations<F>(&self, update: F) -> Result<()>
    where
        F: FnOnce(&mut CorrelationTable) -> Result<()>,
    {
        let _writer = self.correlation_writes.lock();
        let mut table = CorrelationTable::clone(&self.correlations.load());
        update(&mut table)?;
        log::debug!("Correlation table now holds {} edges", table.len());
        self.correlations.store(Arc::new(table));
        Ok(())
    }

    pub fn state(&self) -> IndexState {
        match self.current.load_full() {
            Some(generation) => IndexState::Ready {
                generation: generation.id(),
            },
            None => IndexState::NotReady,
        }
    }

    /// The currently published generation, if any.
    pub fn current_generation(&self) -> Option<Arc<Generation>> {
        self.current.load_full()
    }

    pub fn stats(&self) -> Option<GenerationStats> {
        self.current.load_full().map(|generation| generation.stats())
    }

    /// Rebuild from `manifests` and publish the result.
    ///
    /// On error nothing is published and the previous generation stays
    /// active. On success the new generation is visible to every later
    /// search before this returns; its spelling model follows later.
    ///
    /// Inside a tokio runtime the spelling build runs on the blocking pool.
    /// Without one it runs on the calling thread before returning.
    pub fn sync(&self, manifests: &[Manifest]) -> Result<SpellingTask> {
        let id = self.next_generation.fetch_add(1, Ordering::SeqCst);

        let generation = match Generation::build(
            id,
            manifests,
            self.analyzer.clone(),
            self.config.field_weights,
            self.config.link_analysis.clone(),
        ) {
            Ok(generation) => Arc::new(generation),
            Err(e) => {
                log::warn!("Rebuild of generation {} failed: {}", id, e);
                return Err(e);
            }
        };

        let stats = generation.stats();
        self.current.store(Some(generation.clone()));
        log::info!(
            "Published generation {} ({} documents, {} terms, {} links)",
            stats.generation,
            stats.documents,
            stats.terms,
            stats.links
        );

        let dictionary = self.dictionary.clone();
        let spelling = self.config.spelling.clone();
        let state = match Handle::try_current() {
            Ok(runtime) => TaskState::Running(
                runtime.spawn_blocking(move || build_spelling(&generation, dictionary.as_ref(), &spelling)),
            ),
            Err(_) => {
                log::debug!("No async runtime; building spelling model for generation {} inline", id);
                TaskState::Done(build_spelling(&generation, dictionary.as_ref(), &spelling))
            }
        };

        Ok(SpellingTask {
            generation: id,
            state,
        })
    }

    /// Answer a query against the current generation.
    ///
    /// Spelling corrections are computed only when there are no results or
    /// the top result's reported score is at or below the configured
    /// threshold, and only once the generation's spelling model is attached.
    pub fn search(
        &self,
        raw_query: &str,
        scope: &SearchScope,
        use_link_analysis: bool,
    ) -> Result<SearchResponse> {
        let generation = self.current.load_full().ok_or(FathomError::StillIndexing)?;
        let query = self.parser.parse(raw_query)?;
        let correlations = self.correlations.load_full();

        let ranked = generation.search(&query, &correlations, scope, use_link_analysis);
        let top_score = ranked.first().map(|hit| reported_score(hit.score));

        let results: Vec<SearchResult> = ranked
            .iter()
            .take(self.config.max_results)
            .filter_map(|hit| {
                generation.document(hit.doc_id).map(|document| SearchResult {
                    title: document.title.clone(),
                    preview: document.preview.clone(),
                    url: document.url.clone(),
                    score: reported_score(hit.score),
                })
            })
            .collect();

        let mut spelling_corrections = BTreeMap::new();
        let uncertain = top_score.is_none_or(|score| score <= self.config.spelling.threshold);
        if uncertain && let Some(model) = generation.spelling() {
            for term in query.terms() {
                if let Some(correction) = model.correction(term) {
                    spelling_corrections.insert(term.to_string(), correction);
                }
            }
        }

        log::debug!(
            "Query '{}' on generation {}: {} results, {} corrections",
            query,
            generation.id(),
            results.len(),
            spelling_corrections.len()
        );

        Ok(SearchResponse {
            results,
            spelling_corrections,
        })
    }
}

impl std::fmt::Debug for IndexCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCoordinator")
            .field("state", &self.state())
            .field("analyzer", &self.analyzer.name())
            .field("dictionary", &self.dictionary)
            .finish()
    }
}

fn build_spelling(
    generation: &Generation,
    dictionary: &dyn DictionaryProvider,
    config: &SpellingConfig,
) -> Result<()> {
    let reference = match dictionary.load() {
        Ok(reference) => reference,
        Err(e) => {
            log::warn!(
                "Spelling model for generation {} unavailable: {}",
                generation.id(),
                e
            );
            return Err(e);
        }
    };

    let model = SpellingModel::build(generation.id(), &reference, generation.vocabulary(), config);
    log::info!(
        "Spelling model attached to generation {} ({} words)",
        generation.id(),
        model.word_count()
    );
    generation.attach_spelling(model);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ManifestDocument;
    use crate::spelling::provider::StaticDictionary;

    fn coordinator() -> IndexCoordinator {
        IndexCoordinator::new(FathomConfig::default(), Arc::new(StaticDictionary::empty())).unwrap()
    }

    fn manifests() -> Vec<Manifest> {
        vec![
            Manifest::new("docs", true)
                .with_document(
                    ManifestDocument::new("Aggregation Pipeline", "u/agg", "stages transform documents")
                        .with_preview("Pipelines"),
                )
                .with_document(ManifestDocument::new("Indexes", "u/idx", "compound indexes")),
        ]
    }

    #[test]
    fn test_reported_score() {
        assert_eq!(reported_score(0.0), 0.0);
        assert_eq!(reported_score(1.0), 0.5);
        assert!((reported_score(10.0) - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_search_before_sync() {
        let coordinator = coordinator();
        assert_eq!(coordinator.state(), IndexState::NotReady);
        assert!(matches!(
            coordinator.search("anything", &SearchScope::GlobalOnly, false),
            Err(FathomError::StillIndexing)
        ));
        assert!(coordinator.stats().is_none());
    }

    #[test]
    fn test_sync_without_runtime_builds_spelling_inline() {
        let coordinator = coordinator();
        let task = coordinator.sync(&manifests()).unwrap();

        assert!(task.is_finished());
        assert_eq!(task.generation(), 1);
        assert_eq!(coordinator.state(), IndexState::Ready { generation: 1 });
        assert!(coordinator.stats().unwrap().spelling_ready);
    }

    #[test]
    fn test_search_maps_documents() {
        let coordinator = coordinator();
        coordinator.sync(&manifests()).unwrap();

        let response = coordinator
            .search("aggregation", &SearchScope::GlobalOnly, false)
            .unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].url, "u/agg");
        assert_eq!(response.results[0].preview, "Pipelines");
        assert!(response.spelling_corrections.is_empty());
    }

    #[test]
    fn test_corrections_when_nothing_matches() {
        let coordinator = coordinator();
        coordinator.sync(&manifests()).unwrap();

        let response = coordinator
            .search("agregation", &SearchScope::GlobalOnly, false)
            .unwrap();
        assert!(response.results.is_empty());
        assert_eq!(
            response.spelling_corrections.get("agregation").map(String::as_str),
            Some("aggregation")
        );
    }

    #[test]
    fn test_failed_sync_keeps_previous_generation() {
        let coordinator = coordinator();
        coordinator.sync(&manifests()).unwrap();

        let invalid = vec![Manifest::new("docs", true)
            .with_document(ManifestDocument::new("Broken", "", "no url"))];
        assert!(matches!(
            coordinator.sync(&invalid),
            Err(FathomError::InvalidManifest(_))
        ));

        assert_eq!(coordinator.state(), IndexState::Ready { generation: 1 });
        let response = coordinator.search("indexes", &SearchScope::GlobalOnly, false).unwrap();
        assert_eq!(response.results.len(), 1);
    }

    #[test]
    fn test_correlation_registered_after_sync_applies() {
        let coordinator = coordinator();
        let manifests = vec![Manifest::new("docs", true)
            .with_document(ManifestDocument::new("Basics", "u/0", "regular expression basics"))
            .with_document(ManifestDocument::new("Regex", "u/1", ""))];
        coordinator.sync(&manifests).unwrap();

        let before = coordinator.search("regex", &SearchScope::GlobalOnly, false).unwrap();
        assert_eq!(before.results.len(), 1);

        coordinator
            .correlate_word("regular expression", "regex", 0.8, false)
            .unwrap();
        assert_eq!(coordinator.state(), IndexState::Ready { generation: 1 });

        let after = coordinator.search("regex", &SearchScope::GlobalOnly, false).unwrap();
        let urls: Vec<_> = after.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["u/1", "u/0"]);

        let reverse = coordinator
            .search("regular expression", &SearchScope::GlobalOnly, false)
            .unwrap();
        let urls: Vec<_> = reverse.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["u/1", "u/0"]);
    }

    #[test]
    fn test_correlate_edges_is_all_or_nothing() {
        let coordinator = coordinator();
        let edges: Vec<CorrelationEdge> = serde_json::from_str(
            r#"[{"from": "ops", "to": "operations", "weight": 0.7},
                {"from": "db", "to": "database", "weight": 2.0}]"#,
        )
        .unwrap();

        assert!(matches!(
            coordinator.correlate_edges(&edges),
            Err(FathomError::InvalidCorrelation(_))
        ));
        assert!(coordinator.correlations().is_empty());

        coordinator.correlate_edges(&edges[..1]).unwrap();
        assert_eq!(coordinator.correlations().len(), 2);
    }

    #[test]
    fn test_max_results_truncates() {
        let config = FathomConfig {
            max_results: 1,
            ..Default::default()
        };
        let coordinator = IndexCoordinator::new(config, Arc::new(StaticDictionary::empty())).unwrap();
        coordinator.sync(&manifests()).unwrap();

        let response = coordinator
            .search("documents indexes", &SearchScope::GlobalOnly, false)
            .unwrap();
        assert_eq!(response.results.len(), 1);
    }

    #[test]
    fn test_wire_format_omits_score() {
        let response = SearchResponse {
            results: vec![SearchResult {
                title: "T".into(),
                preview: "P".into(),
                url: "U".into(),
                score: 0.9,
            }],
            spelling_corrections: BTreeMap::from([("regx".to_string(), "regex".to_string())]),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "results": [{"title": "T", "preview": "P", "url": "U"}],
                "spellingCorrections": {"regx": "regex"}
            })
        );
    }
}
