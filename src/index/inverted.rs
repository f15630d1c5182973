//! Weighted inverted index.
//!
//! Documents are ingested through an [`InvertedIndexWriter`] while a rebuild
//! is in progress. [`InvertedIndexWriter::finish`] freezes the postings into an
//! immutable [`InvertedIndex`] that can be shared between searches.
//!
//! A posting's weight is `occurrences × field weight × document weight`. At
//! query time each query term contributes its own postings at full weight and
//! the postings of every correlated term discounted by the edge weight. The
//! correlation table is passed to every search, so edges registered after
//! the index was built still apply.
//!
//! ```
//! use std::sync::Arc;
//! use fathom::analysis::analyzer::StandardAnalyzer;
//! use fathom::config::FieldWeights;
//! use fathom::document::{collect_documents, Manifest, ManifestDocument};
//! use fathom::index::correlation::CorrelationTable;
//! use fathom::index::inverted::InvertedIndexWriter;
//! use fathom::query::QueryParser;
//!
//! let analyzer = Arc::new(StandardAnalyzer::new());
//! let manifests = vec![Manifest::new("docs", true)
//!     .with_document(ManifestDocument::new("Sharding", "u/shard", "split data"))];
//! let documents = collect_documents(&manifests).unwrap();
//!
//! let mut writer = InvertedIndexWriter::new(analyzer.clone(), FieldWeights::default());
//! for document in &documents {
//!     writer.add(document, |_| {}).unwrap();
//! }
//! let index = writer.finish();
//!
//! let query = QueryParser::new(analyzer).parse("sharding").unwrap();
//! let hits = index.search(&query, &CorrelationTable::new(), |_| true, None);
//! assert_eq!(hits[0].doc_id, 0);
//! assert_eq!(hits[0].score, 10.0);
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::config::FieldWeights;
use crate::document::{DocId, Document, Field};
use crate::error::Result;
use crate::index::correlation::{Correlation, CorrelationTable};
use crate::query::Query;

/// A weighted occurrence of a term in one field of one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub field: Field,
    pub weight: f64,
}

/// A document with its final ranking score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f64,
}

/// Multiplicative adjustment applied to relevance scores after accumulation.
///
/// Implementations must return a finite multiplier `>= 1.0` so that a boost
/// can reorder matching documents but never hide or invent matches.
pub trait ScoreBoost {
    fn multiplier(&self, doc_id: DocId) -> f64;
}

/// Builds an index for one generation.
pub struct InvertedIndexWriter {
    analyzer: Arc<dyn Analyzer>,
    field_weights: FieldWeights,
    postings: AHashMap<String, Vec<Posting>>,
    doc_count: usize,
}

impl InvertedIndexWriter {
    pub fn new(analyzer: Arc<dyn Analyzer>, field_weights: FieldWeights) -> Self {
        InvertedIndexWriter {
            analyzer,
            field_weights,
            postings: AHashMap::new(),
            doc_count: 0,
        }
    }

    /// Ingest one document.
    ///
    /// `on_word` is called once for every distinct term of the document, in
    /// lexicographic order. Empty fields add nothing.
    pub fn add<F>(&mut self, document: &Document, mut on_word: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        let mut distinct = BTreeSet::new();

        for field in Field::ALL {
            let text = document.field_text(field);
            if text.trim().is_empty() {
                continue;
            }

            let mut counts: BTreeMap<String, u32> = BTreeMap::new();
            for term in self.analyzer.terms(&text)? {
                *counts.entry(term).or_insert(0) += 1;
            }

            let field_weight = self.field_weights.weight(field) * document.weight;
            for (term, occurrences) in counts {
                self.postings.entry(term.clone()).or_default().push(Posting {
                    doc_id: document.id,
                    field,
                    weight: occurrences as f64 * field_weight,
                });
                distinct.insert(term);
            }
        }

        for term in &distinct {
            on_word(term);
        }
        self.doc_count += 1;
        Ok(())
    }

    /// Number of documents added so far.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Freeze the postings into a searchable index.
    pub fn finish(mut self) -> InvertedIndex {
        for postings in self.postings.values_mut() {
            postings.sort_by(|a, b| a.doc_id.cmp(&b.doc_id).then(a.field.cmp(&b.field)));
        }

        InvertedIndex {
            postings: self.postings,
            doc_count: self.doc_count,
        }
    }
}

impl fmt::Debug for InvertedIndexWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvertedIndexWriter")
            .field("analyzer", &self.analyzer.name())
            .field("terms", &self.postings.len())
            .field("doc_count", &self.doc_count)
            .finish()
    }
}

/// An immutable, searchable index.
#[derive(Debug)]
pub struct InvertedIndex {
    postings: AHashMap<String, Vec<Posting>>,
    doc_count: usize,
}

impl InvertedIndex {
    /// Postings of a single term, ordered by document then field.
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Rank documents for a query.
    ///
    /// Each query term adds its own postings and those of its correlated
    /// terms. A multi-word correlation source applies once when all of its
    /// words are in the query.
    ///
    /// Only documents for which `accept` returns true are scored. When a
    /// `boost` is given each raw score is multiplied by it. Results are sorted
    /// by descending score, ties broken by ascending document id; documents
    /// that match no query term are absent.
    pub fn search<F>(
        &self,
        query: &Query,
        correlations: &CorrelationTable,
        accept: F,
        boost: Option<&dyn ScoreBoost>,
    ) -> Vec<ScoredDocument>
    where
        F: Fn(DocId) -> bool,
    {
        let mut scores: AHashMap<DocId, f64> = AHashMap::new();

        for term in query.terms() {
            accumulate(&mut scores, self.postings(term), 1.0, &accept);
            self.accumulate_correlated(&mut scores, correlations.correlations(term), &accept);
        }

        let terms: AHashSet<&str> = query.terms().collect();
        let mut phrases: Vec<_> = correlations.phrases_within(&terms).collect();
        phrases.sort_by_key(|(source, _)| *source);
        for (_, targets) in phrases {
            self.accumulate_correlated(&mut scores, targets, &accept);
        }

        let mut results: Vec<ScoredDocument> = scores
            .into_iter()
            .filter(|(_, score)| *score > 0.0)
            .map(|(doc_id, score)| {
                let multiplier = boost.map_or(1.0, |b| b.multiplier(doc_id));
                ScoredDocument {
                    doc_id,
                    score: score * multiplier,
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        results
    }

    fn accumulate_correlated<F>(
        &self,
        scores: &mut AHashMap<DocId, f64>,
        targets: &[Correlation],
        accept: &F,
    ) where
        F: Fn(DocId) -> bool,
    {
        for correlation in targets {
            let postings = self.correlated_postings(correlation);
            accumulate(scores, &postings, correlation.weight, accept);
        }
    }

    /// Postings of a correlated term.
    ///
    /// A multi-word term matches a field only when every word occurs in it;
    /// the weight is the smallest of the words' weights in that field.
    fn correlated_postings(&self, correlation: &Correlation) -> Cow<'_, [Posting]> {
        let mut components = correlation.components();
        let Some(first) = components.next() else {
            return Cow::Borrowed(&[]);
        };

        let rest: Vec<&str> = components.collect();
        if rest.is_empty() {
            return Cow::Borrowed(self.postings(first));
        }

        let mut matched: BTreeMap<(DocId, Field), f64> = self
            .postings(first)
            .iter()
            .map(|p| ((p.doc_id, p.field), p.weight))
            .collect();

        for component in rest {
            let weights: AHashMap<(DocId, Field), f64> = self
                .postings(component)
                .iter()
                .map(|p| ((p.doc_id, p.field), p.weight))
                .collect();

            matched.retain(|key, weight| match weights.get(key) {
                Some(other) => {
                    *weight = weight.min(*other);
                    true
                }
                None => false,
            });

            if matched.is_empty() {
                break;
            }
        }

        Cow::Owned(
            matched
                .into_iter()
                .map(|((doc_id, field), weight)| Posting {
                    doc_id,
                    field,
                    weight,
                })
                .collect(),
        )
    }
}

fn accumulate<F>(scores: &mut AHashMap<DocId, f64>, postings: &[Posting], factor: f64, accept: &F)
where
    F: Fn(DocId) -> bool,
{
    for posting in postings {
        if accept(posting.doc_id) {
            *scores.entry(posting.doc_id).or_insert(0.0) += posting.weight * factor;
        }
    }
}
