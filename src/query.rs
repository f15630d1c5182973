//! Query parsing.
//!
//! A raw query string is normalized with the same analyzer used for indexing
//! and reduced to a set of distinct terms. Which documents a query may see is
//! decided separately by a [`scope::SearchScope`].
//!
//! ```
//! use std::sync::Arc;
//! use fathom::analysis::analyzer::StandardAnalyzer;
//! use fathom::query::QueryParser;
//!
//! let parser = QueryParser::new(Arc::new(StandardAnalyzer::new()));
//! let query = parser.parse("Replica replica SET").unwrap();
//! assert_eq!(query.terms().collect::<Vec<_>>(), vec!["replica", "set"]);
//! ```

pub mod scope;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::error::{FathomError, Result};

pub use scope::SearchScope;

/// Default cap on distinct query terms.
pub const DEFAULT_MAX_TERMS: usize = 10;

/// A parsed query: distinct normalized terms in lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    raw: String,
    terms: BTreeSet<String>,
}

impl Query {
    /// The string the query was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<&str> = self.terms().collect();
        write!(f, "{}", terms.join(" "))
    }
}

/// Parses raw query strings into [`Query`] values.
#[derive(Debug, Clone)]
pub struct QueryParser {
    analyzer: Arc<dyn Analyzer>,
    max_terms: usize,
}

impl QueryParser {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser {
            analyzer,
            max_terms: DEFAULT_MAX_TERMS,
        }
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    pub fn max_terms(&self) -> usize {
        self.max_terms
    }

    /// Parse a raw query string.
    ///
    /// Fails with `QueryTooLong` when the number of distinct terms exceeds the
    /// configured maximum. A query without any word characters parses to an
    /// empty query.
    pub fn parse(&self, raw: &str) -> Result<Query> {
        let terms: BTreeSet<String> = self.analyzer.terms(raw)?.into_iter().collect();

        if terms.len() > self.max_terms {
            return Err(FathomError::QueryTooLong {
                terms: terms.len(),
                max: self.max_terms,
            });
        }

        Ok(Query {
            raw: raw.to_string(),
            terms,
        })
    }
}
