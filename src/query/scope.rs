//! Search scope selection.

use std::collections::BTreeSet;

use crate::document::Document;

/// Which documents a search may return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchScope {
    /// Only documents whose search property is in the set.
    Scoped(BTreeSet<String>),
    /// Only documents flagged for inclusion in unscoped search.
    #[default]
    GlobalOnly,
}

impl SearchScope {
    /// Build a scope from requested search properties.
    ///
    /// No properties (or only blank ones) selects [`SearchScope::GlobalOnly`].
    pub fn from_properties<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = properties
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if set.is_empty() {
            SearchScope::GlobalOnly
        } else {
            SearchScope::Scoped(set)
        }
    }

    pub fn admits(&self, document: &Document) -> bool {
        match self {
            SearchScope::Scoped(properties) => properties.contains(&document.search_property),
            SearchScope::GlobalOnly => document.include_in_global_search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Manifest, ManifestDocument, collect_documents};

    #[test]
    fn test_from_properties() {
        assert_eq!(
            SearchScope::from_properties(Vec::<String>::new()),
            SearchScope::GlobalOnly
        );
        assert_eq!(SearchScope::from_properties([" "]), SearchScope::GlobalOnly);

        match SearchScope::from_properties(["docs", "api", "docs"]) {
            SearchScope::Scoped(set) => assert_eq!(set.len(), 2),
            other => panic!("expected scoped, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_global_only() {
        assert_eq!(SearchScope::default(), SearchScope::GlobalOnly);
    }

    #[test]
    fn test_admits() {
        let manifests = vec![
            Manifest::new("docs", true).with_document(ManifestDocument::new("A", "u/a", "")),
            Manifest::new("api", false).with_document(ManifestDocument::new("B", "u/b", "")),
        ];
        let documents = collect_documents(&manifests).unwrap();

        let docs_only = SearchScope::from_properties(["docs"]);
        assert!(docs_only.admits(&documents[0]));
        assert!(!docs_only.admits(&documents[1]));

        let global = SearchScope::GlobalOnly;
        assert!(global.admits(&documents[0]));
        assert!(!global.admits(&documents[1]));

        let api = SearchScope::from_properties(["api"]);
        assert!(api.admits(&documents[1]));
    }
}
