//! Analyzers turn raw text into normalized terms.
//!
//! ```
//! use fathom::analysis::analyzer::{Analyzer, StandardAnalyzer};
//!
//! let analyzer = StandardAnalyzer::new();
//! let terms = analyzer.terms("  Regex GUIDE ").unwrap();
//! assert_eq!(terms, vec!["regex", "guide"]);
//! ```

use std::fmt::Debug;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
pub trait Analyzer: Send + Sync + Debug {
    /// Analyze the given text into a stream of normalized tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &'static str;

    /// Analyze and keep only the term text, in stream order.
    fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}

/// Unicode word tokenization followed by trimming and lowercasing.
#[derive(Debug, Default)]
pub struct StandardAnalyzer {
    tokenizer: UnicodeWordTokenizer,
}

impl StandardAnalyzer {
    pub fn new() -> Self {
        StandardAnalyzer {
            tokenizer: UnicodeWordTokenizer::new(),
        }
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let tokens = self.tokenizer.tokenize(text)?.filter_map(|token| {
            let normalized = token.text.trim().to_lowercase();
            if normalized.is_empty() {
                None
            } else {
                Some(Token {
                    text: normalized,
                    ..token
                })
            }
        });

        Ok(Box::new(tokens))
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_analyzer_lowercases() {
        let analyzer = StandardAnalyzer::new();
        let tokens: Vec<_> = analyzer.analyze("The QUICK Brown").unwrap().collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "the");
        assert_eq!(tokens[1].text, "quick");
        assert_eq!(tokens[2].text, "brown");
        assert_eq!(tokens[2].position, 2);
    }

    #[test]
    fn test_terms_keeps_duplicates() {
        let analyzer = StandardAnalyzer::new();
        let terms = analyzer.terms("Rust rust RUST").unwrap();
        assert_eq!(terms, vec!["rust", "rust", "rust"]);
    }
}
