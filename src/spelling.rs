//! Spelling correction for low-quality queries.
//!
//! A [`model::SpellingModel`] is built once per index generation from a
//! reference dictionary (supplied by a [`provider::DictionaryProvider`]) and the
//! generation's vocabulary. Suggestions are ranked by edit distance and word
//! frequency through [`suggest::SuggestionEngine`].

pub mod dictionary;
pub mod levenshtein;
pub mod model;
pub mod provider;
pub mod suggest;
