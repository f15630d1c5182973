//! Forward and backward link adjacency.

use std::collections::BTreeSet;

use ahash::AHashMap;

use crate::document::{DocId, Document};

/// Link adjacency for one generation.
///
/// Links to URLs outside the corpus are kept in the adjacency maps but never
/// resolve to a document id, so they carry no score.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    forward: AHashMap<String, Vec<String>>,
    backward: AHashMap<String, Vec<String>>,
    url_to_id: AHashMap<String, DocId>,
    id_to_url: Vec<String>,
    edges: Vec<(DocId, DocId)>,
}

impl LinkGraph {
    /// Build the graph from documents ordered by id.
    pub fn build(documents: &[Document]) -> Self {
        let mut graph = LinkGraph {
            id_to_url: Vec::with_capacity(documents.len()),
            ..Default::default()
        };

        for document in documents {
            graph.url_to_id.insert(document.url.clone(), document.id);
            graph.id_to_url.push(document.url.clone());
        }

        let mut resolved = BTreeSet::new();
        for document in documents {
            graph
                .forward
                .insert(document.url.clone(), document.links.clone());

            for link in &document.links {
                graph
                    .backward
                    .entry(link.clone())
                    .or_default()
                    .push(document.url.clone());

                if let Some(target) = graph.resolve(link)
                    && target != document.id
                {
                    resolved.insert((document.id, target));
                }
            }
        }

        graph.edges = resolved.into_iter().collect();
        graph
    }

    /// Resolve a link to an indexed document, ignoring any `#fragment`.
    pub fn resolve(&self, url: &str) -> Option<DocId> {
        let base = url.split_once('#').map_or(url, |(base, _)| base);
        self.url_to_id.get(base).copied()
    }

    /// URLs a page links to, in document order.
    pub fn outgoing(&self, url: &str) -> &[String] {
        self.forward.get(url).map(Vec::as_slice).unwrap_or(&[])
    }

    /// URLs of pages linking to `url`, keyed exactly as the link was written.
    pub fn incoming(&self, url: &str) -> &[String] {
        self.backward.get(url).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn url_for_id(&self, id: DocId) -> Option<&str> {
        self.id_to_url.get(id as usize).map(String::as_str)
    }

    /// Distinct links between two different indexed documents, sorted.
    pub fn indexed_edges(&self) -> &[(DocId, DocId)] {
        &self.edges
    }

    pub fn document_count(&self) -> usize {
        self.id_to_url.len()
    }

    /// Total number of links as written, including external ones.
    pub fn link_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Manifest, ManifestDocument, collect_documents};

    fn documents() -> Vec<Document> {
        let manifests = vec![
            Manifest::new("docs", true)
                .with_document(
                    ManifestDocument::new("A", "u/a", "")
                        .with_links(vec!["u/b", "u/b#part", "https://elsewhere", "u/a"]),
                )
                .with_document(ManifestDocument::new("B", "u/b", "").with_links(vec!["u/a"]))
                .with_document(ManifestDocument::new("C", "u/c", "")),
        ];
        collect_documents(&manifests).unwrap()
    }

    #[test]
    fn test_adjacency_keeps_external_links() {
        let graph = LinkGraph::build(&documents());

        assert_eq!(graph.outgoing("u/a").len(), 4);
        assert_eq!(graph.incoming("https://elsewhere"), &["u/a".to_string()]);
        assert_eq!(graph.incoming("u/a").len(), 2);
        assert!(graph.outgoing("u/c").is_empty());
        assert_eq!(graph.link_count(), 5);
    }

    #[test]
    fn test_indexed_edges_dedup_and_skip_self_links() {
        let graph = LinkGraph::build(&documents());
        assert_eq!(graph.indexed_edges(), &[(0, 1), (1, 0)]);
    }

    #[test]
    fn test_url_id_bijection() {
        let graph = LinkGraph::build(&documents());
        for id in 0..graph.document_count() as DocId {
            let url = graph.url_for_id(id).unwrap();
            assert_eq!(graph.resolve(url), Some(id));
        }
        assert_eq!(graph.resolve("u/b#intro"), Some(1));
        assert_eq!(graph.resolve("u/missing"), None);
        assert_eq!(graph.url_for_id(99), None);
    }
}
