//! Generation vocabulary.

use std::collections::BTreeMap;

/// Distinct terms of one generation with their document frequencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: BTreeMap<String, u32>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Vocabulary::default()
    }

    /// Record one document containing `term`.
    pub fn record(&mut self, term: &str) {
        if let Some(count) = self.terms.get_mut(term) {
            *count = count.saturating_add(1);
        } else {
            self.terms.insert(term.to_string(), 1);
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Number of documents that contained `term`.
    pub fn document_frequency(&self, term: &str) -> u32 {
        self.terms.get(term).copied().unwrap_or(0)
    }

    /// Terms in lexicographic order with their document frequencies.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.terms.iter().map(|(term, count)| (term.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
