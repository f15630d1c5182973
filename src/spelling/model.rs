//! Per-generation spelling model.

use std::fmt;

use crate::config::SpellingConfig;
use crate::index::vocabulary::Vocabulary;
use crate::spelling::dictionary::SpellingDictionary;
use crate::spelling::suggest::{Suggestion, SuggestionConfig, SuggestionEngine};

/// Spelling model for one index generation.
///
/// Holds the reference dictionary entries that the generation's vocabulary
/// also contains, plus every vocabulary word, so an indexed term is never
/// reported as misspelled.
#[derive(Clone)]
pub struct SpellingModel {
    generation: u64,
    engine: SuggestionEngine,
}

impl SpellingModel {
    /// Build a model from a reference dictionary and a generation vocabulary.
    ///
    /// A word's frequency is its reference frequency (if the dictionary knows
    /// it) plus its document frequency in the corpus.
    pub fn build(
        generation: u64,
        reference: &SpellingDictionary,
        vocabulary: &Vocabulary,
        config: &SpellingConfig,
    ) -> Self {
        let mut dictionary = SpellingDictionary::new();
        for (word, frequency) in reference.iter() {
            if vocabulary.contains(word) {
                dictionary.add_word(word, frequency);
            }
        }

        for (word, document_frequency) in vocabulary.iter() {
            let current = dictionary.frequency(word);
            dictionary.add_word(word, current.saturating_add(document_frequency));
        }

        let suggestion_config = SuggestionConfig {
            max_distance: config.max_distance,
            max_suggestions: config.max_suggestions,
            ..Default::default()
        };

        SpellingModel {
            generation,
            engine: SuggestionEngine::with_config(dictionary, suggestion_config),
        }
    }

    /// The generation this model was built for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_known(&self, term: &str) -> bool {
        self.engine.is_correct(term)
    }

    /// Ranked candidate corrections; empty for known or hopeless terms.
    pub fn suggest(&self, term: &str) -> Vec<Suggestion> {
        if self.is_known(term) {
            return Vec::new();
        }
        self.engine.suggest(term)
    }

    /// The single correction surfaced to callers, if any.
    pub fn correction(&self, term: &str) -> Option<String> {
        self.suggest(term).into_iter().next().map(|s| s.word)
    }

    /// Number of words the model recognizes.
    pub fn word_count(&self) -> usize {
        self.engine.dictionary().word_count()
    }
}

impl fmt::Debug for SpellingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpellingModel")
            .field("generation", &self.generation)
            .field("words", &self.word_count())
            .finish()
    }
}
