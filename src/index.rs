//! The weighted inverted index and its companions.
//!
//! - [`correlation::CorrelationTable`] holds the synonym-like term edges.
//! - [`inverted::InvertedIndexWriter`] ingests documents during a rebuild and
//!   freezes into an [`inverted::InvertedIndex`] that answers searches.
//! - [`vocabulary::Vocabulary`] collects the distinct terms of a generation.

pub mod correlation;
pub mod inverted;
pub mod vocabulary;
