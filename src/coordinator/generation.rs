//! One immutable index generation.

use std::fmt;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::config::{FieldWeights, LinkAnalysisConfig};
use crate::document::{DocId, Document, Manifest, collect_documents};
use crate::error::Result;
use crate::index::correlation::CorrelationTable;
use crate::index::inverted::{InvertedIndex, InvertedIndexWriter, ScoreBoost, ScoredDocument};
use crate::index::vocabulary::Vocabulary;
use crate::link::graph::LinkGraph;
use crate::link::hits::{HubAuthorityScores, LinkBoost};
use crate::query::{Query, SearchScope};
use crate::spelling::model::SpellingModel;

/// Summary of a published generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u64,
    pub documents: usize,
    pub terms: usize,
    pub links: usize,
    pub spelling_ready: bool,
    pub built_at: DateTime<Utc>,
}

/// Index, document store, link graph and vocabulary from a single rebuild.
///
/// Everything except the spelling slot is fixed at construction. The spelling
/// model arrives later, independently of publication, and authority/hub
/// scores are computed on first use.
pub struct Generation {
    id: u64,
    documents: Vec<Document>,
    index: InvertedIndex,
    links: LinkGraph,
    vocabulary: Vocabulary,
    link_config: LinkAnalysisConfig,
    hub_authority: OnceLock<HubAuthorityScores>,
    spelling: ArcSwapOption<SpellingModel>,
    built_at: DateTime<Utc>,
}

impl Generation {
    /// Build a complete generation from manifests.
    ///
    /// Fails without side effects when a manifest is invalid.
    pub fn build(
        id: u64,
        manifests: &[Manifest],
        analyzer: Arc<dyn Analyzer>,
        field_weights: FieldWeights,
        link_config: LinkAnalysisConfig,
    ) -> Result<Self> {
        let documents = collect_documents(manifests)?;
        log::debug!(
            "generation {}: collected {} documents from {} manifests",
            id,
            documents.len(),
            manifests.len()
        );

        let mut writer = InvertedIndexWriter::new(analyzer, field_weights);
        let mut vocabulary = Vocabulary::new();
        for document in &documents {
            writer.add(document, |word| vocabulary.record(word))?;
        }
        let index = writer.finish();
        log::debug!(
            "generation {}: indexed {} terms",
            id,
            index.term_count()
        );

        let links = LinkGraph::build(&documents);
        log::debug!(
            "generation {}: {} links, {} between indexed documents",
            id,
            links.link_count(),
            links.indexed_edges().len()
        );

        Ok(Generation {
            id,
            documents,
            index,
            links,
            vocabulary,
            link_config,
            hub_authority: OnceLock::new(),
            spelling: ArcSwapOption::empty(),
            built_at: Utc::now(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn document(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id as usize)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn links(&self) -> &LinkGraph {
        &self.links
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Authority/hub scores, computed once per generation on first use.
    pub fn hub_authority(&self) -> &HubAuthorityScores {
        self.hub_authority.get_or_init(|| {
            HubAuthorityScores::compute(
                self.documents.len(),
                self.links.indexed_edges(),
                &self.link_config,
            )
        })
    }

    /// Rank the documents admitted by `scope` for `query`.
    pub fn search(
        &self,
        query: &Query,
        correlations: &CorrelationTable,
        scope: &SearchScope,
        use_link_analysis: bool,
    ) -> Vec<ScoredDocument> {
        let accept = |doc_id: DocId| {
            self.document(doc_id)
                .is_some_and(|document| scope.admits(document))
        };

        if use_link_analysis {
            let boost = LinkBoost::new(self.hub_authority(), &self.link_config);
            self.index
                .search(query, correlations, accept, Some(&boost as &dyn ScoreBoost))
        } else {
            self.index.search(query, correlations, accept, None)
        }
    }

    /// Attach the spelling model built for this generation.
    pub fn attach_spelling(&self, model: SpellingModel) {
        self.spelling.store(Some(Arc::new(model)));
    }

    /// The spelling model, if it has been attached yet.
    pub fn spelling(&self) -> Option<Arc<SpellingModel>> {
        self.spelling.load_full()
    }

    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            generation: self.id,
            documents: self.documents.len(),
            terms: self.vocabulary.len(),
            links: self.links.link_count(),
            spelling_ready: self.spelling.load().is_some(),
            built_at: self.built_at,
        }
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generation")
            .field("id", &self.id)
            .field("documents", &self.documents.len())
            .field("terms", &self.vocabulary.len())
            .field("spelling_ready", &self.spelling.load().is_some())
            .finish()
    }
}
