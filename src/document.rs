//! Documents and the manifests that group them.
//!
//! A [`Manifest`] is the unit callers hand to `sync`: a scope tag plus the
//! documents published under it. During a rebuild every manifest document is
//! validated and turned into an immutable [`Document`] with a dense id.

use std::fmt;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{FathomError, Result};

/// Dense, 0-based document identifier within one generation.
pub type DocId = u32;

/// One of the indexed document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Headings,
    Text,
}

impl Field {
    /// All fields in posting order.
    pub const ALL: [Field; 3] = [Field::Title, Field::Headings, Field::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Headings => "headings",
            Field::Text => "text",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A document as supplied inside a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    pub title: String,
    #[serde(default)]
    pub headings: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub url: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub links: Vec<String>,
}

impl ManifestDocument {
    /// Create a document with only a title, url and body text.
    pub fn new<S: Into<String>>(title: S, url: S, text: S) -> Self {
        ManifestDocument {
            title: title.into(),
            headings: Vec::new(),
            text: text.into(),
            weight: 1.0,
            url: url.into(),
            preview: String::new(),
            links: Vec::new(),
        }
    }

    pub fn with_headings<S: Into<String>>(mut self, headings: Vec<S>) -> Self {
        self.headings = headings.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_preview<S: Into<String>>(mut self, preview: S) -> Self {
        self.preview = preview.into();
        self
    }

    pub fn with_links<S: Into<String>>(mut self, links: Vec<S>) -> Self {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }
}

/// A scoped collection of documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub search_property: String,
    #[serde(default)]
    pub include_in_global_search: bool,
    #[serde(default)]
    pub documents: Vec<ManifestDocument>,
}

impl Manifest {
    pub fn new<S: Into<String>>(search_property: S, include_in_global_search: bool) -> Self {
        Manifest {
            search_property: search_property.into(),
            include_in_global_search,
            documents: Vec::new(),
        }
    }

    pub fn with_document(mut self, document: ManifestDocument) -> Self {
        self.documents.push(document);
        self
    }
}

/// An indexed document owned by exactly one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub headings: Vec<String>,
    pub text: String,
    pub weight: f64,
    pub url: String,
    pub preview: String,
    pub search_property: String,
    pub include_in_global_search: bool,
    pub links: Vec<String>,
}

impl Document {
    /// Raw text of a field; headings are joined with spaces.
    pub fn field_text(&self, field: Field) -> String {
        match field {
            Field::Title => self.title.clone(),
            Field::Headings => self.headings.join(" "),
            Field::Text => self.text.clone(),
        }
    }
}

/// Validate manifests and flatten them into documents with dense ids.
///
/// Ids follow manifest order, then document order within a manifest, so the
/// same input always yields the same assignment.
pub fn collect_documents(manifests: &[Manifest]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    let mut seen_urls = AHashSet::new();

    for (manifest_index, manifest) in manifests.iter().enumerate() {
        if manifest.search_property.trim().is_empty() {
            return Err(FathomError::invalid_manifest(format!(
                "manifest {manifest_index} has an empty searchProperty"
            )));
        }

        for (doc_index, doc) in manifest.documents.iter().enumerate() {
            let location = format!("{}[{}]", manifest.search_property, doc_index);

            if doc.url.trim().is_empty() {
                return Err(FathomError::invalid_manifest(format!(
                    "document {location} has an empty url"
                )));
            }
            if !(doc.weight.is_finite() && doc.weight > 0.0) {
                return Err(FathomError::invalid_manifest(format!(
                    "document {location} has non-positive weight {}",
                    doc.weight
                )));
            }
            if !seen_urls.insert(doc.url.as_str()) {
                return Err(FathomError::invalid_manifest(format!(
                    "document {location} reuses url '{}'",
                    doc.url
                )));
            }

            let id = DocId::try_from(documents.len()).map_err(|_| {
                FathomError::invalid_manifest("too many documents for one generation")
            })?;

            documents.push(Document {
                id,
                title: doc.title.clone(),
                headings: doc.headings.clone(),
                text: doc.text.clone(),
                weight: doc.weight,
                url: doc.url.clone(),
                preview: doc.preview.clone(),
                search_property: manifest.search_property.clone(),
                include_in_global_search: manifest.include_in_global_search,
                links: doc.links.clone(),
            });
        }
    }

    Ok(documents)
}
