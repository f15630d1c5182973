//! Text analysis for indexing and query parsing.
//!
//! Both sides of the engine run text through the same [`analyzer::Analyzer`]
//! so that a query term and an indexed term normalize identically.

pub mod analyzer;
pub mod token;
pub mod tokenizer;
