//! # Fathom
//!
//! An in-memory documentation search engine.
//!
//! ## Features
//!
//! - Field-weighted inverted index over title, headings and body text
//! - Term correlations that let a query match related wording at a discount
//! - Optional HITS link analysis blended into relevance
//! - Scoped search by search property or global inclusion
//! - Spelling fallback built per index generation from a reference dictionary
//! - Lock-free reads: each rebuild publishes an immutable generation
//!
//! ```
//! use std::sync::Arc;
//!
//! use fathom::config::FathomConfig;
//! use fathom::coordinator::IndexCoordinator;
//! use fathom::document::{Manifest, ManifestDocument};
//! use fathom::query::SearchScope;
//! use fathom::spelling::provider::StaticDictionary;
//!
//! let coordinator =
//!     IndexCoordinator::new(FathomConfig::default(), Arc::new(StaticDictionary::empty())).unwrap();
//! coordinator.correlate_word("regular expression", "regex", 0.8, false).unwrap();
//!
//! let manifests = vec![Manifest::new("docs", true)
//!     .with_document(ManifestDocument::new("Pattern Matching", "https://docs/patterns", "regular expression basics"))];
//! coordinator.sync(&manifests).unwrap();
//!
//! let response = coordinator.search("regex", &SearchScope::GlobalOnly, false).unwrap();
//! assert_eq!(response.results[0].url, "https://docs/patterns");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod document;
pub mod error;
pub mod index;
pub mod link;
pub mod protocol;
pub mod query;
pub mod spelling;

pub mod prelude {
    pub use crate::config::FathomConfig;
    pub use crate::coordinator::{IndexCoordinator, SearchResponse, SearchResult};
    pub use crate::document::{Manifest, ManifestDocument};
    pub use crate::error::{FathomError, Result};
    pub use crate::protocol::{Request, Response, SearchService};
    pub use crate::query::SearchScope;
    pub use crate::spelling::provider::{DictionaryProvider, FileDictionary, StaticDictionary};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
