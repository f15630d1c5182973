//! Term correlation table.
//!
//! A correlation edge lets a query term also match a related term at a
//! discount. Edges are static configuration: they are registered before any
//! search and never reference document data.
//!
//! ```
//! use fathom::index::correlation::CorrelationTable;
//!
//! let mut table = CorrelationTable::new();
//! table.correlate_word("regex", "regular expression", 0.8, false).unwrap();
//! table.correlate_word("mongod", "server", 0.5, true).unwrap();
//!
//! assert_eq!(table.correlations("regular expression")[0].term, "regex");
//! assert_eq!(table.correlations("mongod")[0].weight, 0.5);
//! assert!(table.correlations("server").is_empty());
//! ```

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{FathomError, Result};

/// An outgoing correlation from some source term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    /// Normalized target term; may contain several space-separated words.
    pub term: String,
    /// Discount relative to an exact match, in (0, 1].
    pub weight: f64,
}

impl Correlation {
    /// The individual words of the target term.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.term.split(' ')
    }
}

/// A correlation edge as written in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEdge {
    pub from: String,
    pub to: String,
    pub weight: f64,
    #[serde(default)]
    pub directional: bool,
}

/// Source term → outgoing correlations, in registration order.
#[derive(Debug, Clone, Default)]
pub struct CorrelationTable {
    edges: AHashMap<String, Vec<Correlation>>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        CorrelationTable::default()
    }

    /// Build a table from configured edges.
    pub fn from_edges<'a, I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a CorrelationEdge>,
    {
        let mut table = CorrelationTable::new();
        table.add_edges(edges)?;
        Ok(table)
    }

    /// Register configured edges in order, stopping at the first invalid one.
    pub fn add_edges<'a, I>(&mut self, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a CorrelationEdge>,
    {
        for edge in edges {
            self.correlate_word(&edge.from, &edge.to, edge.weight, edge.directional)?;
        }
        Ok(())
    }

    /// Register a correlation between two terms.
    ///
    /// A directional edge only lets `term_a` imply `term_b`. Registering the
    /// same pair again replaces the earlier weight.
    pub fn correlate_word(
        &mut self,
        term_a: &str,
        term_b: &str,
        weight: f64,
        directional: bool,
    ) -> Result<()> {
        let a = normalize_term(term_a);
        let b = normalize_term(term_b);

        if a.is_empty() || b.is_empty() {
            return Err(FathomError::invalid_correlation(format!(
                "empty term in correlation '{term_a}' -> '{term_b}'"
            )));
        }
        if a == b {
            return Err(FathomError::invalid_correlation(format!(
                "term '{a}' cannot correlate with itself"
            )));
        }
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(FathomError::invalid_correlation(format!(
                "weight {weight} for '{a}' -> '{b}' is outside (0, 1]"
            )));
        }

        self.insert(&a, &b, weight);
        if !directional {
            self.insert(&b, &a, weight);
        }
        Ok(())
    }

    fn insert(&mut self, from: &str, to: &str, weight: f64) {
        let targets = self.edges.entry(from.to_string()).or_default();
        match targets.iter_mut().find(|c| c.term == to) {
            Some(existing) => existing.weight = weight,
            None => targets.push(Correlation {
                term: to.to_string(),
                weight,
            }),
        }
    }

    /// Outgoing correlations of a normalized term.
    pub fn correlations(&self, term: &str) -> &[Correlation] {
        self.edges.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Multi-word source terms whose words are all present in `terms`.
    ///
    /// Single-word sources are looked up directly with [`Self::correlations`].
    pub fn phrases_within<'a>(
        &'a self,
        terms: &'a AHashSet<&str>,
    ) -> impl Iterator<Item = (&'a str, &'a [Correlation])> + 'a {
        self.edges.iter().filter_map(move |(source, targets)| {
            let covered = source.contains(' ') && source.split(' ').all(|word| terms.contains(word));
            covered.then_some((source.as_str(), targets.as_slice()))
        })
    }

    /// Number of directed edges.
    pub fn len(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Lowercase, trim and collapse inner whitespace.
fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
