//! Spelling suggestion generation.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::spelling::dictionary::SpellingDictionary;
use crate::spelling::levenshtein::transposition_distance_threshold;

/// A spelling suggestion with a score indicating confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The suggested word.
    pub word: String,
    /// Confidence score (higher is better, 0.0 to 1.0).
    pub score: f64,
    /// Edit distance from the original word.
    pub distance: usize,
    /// Frequency of the suggested word in the dictionary.
    pub frequency: u32,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(word: String, score: f64, distance: usize, frequency: u32) -> Self {
        Suggestion {
            word,
            score,
            distance,
            frequency,
        }
    }

    /// Ranking order: higher score first, then smaller distance, then word.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.distance.cmp(&other.distance))
            .then_with(|| self.word.cmp(&other.word))
    }
}

/// Configuration for spelling suggestion generation.
#[derive(Debug, Clone)]
pub struct SuggestionConfig {
    /// Maximum edit distance to consider.
    pub max_distance: usize,
    /// Maximum number of suggestions to return.
    pub max_suggestions: usize,
    /// Minimum frequency threshold for suggestions.
    pub min_frequency: u32,
    /// Weight for edit distance in scoring (0.0 to 1.0).
    pub distance_weight: f64,
    /// Weight for word frequency in scoring (0.0 to 1.0).
    pub frequency_weight: f64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            max_distance: 2,
            max_suggestions: 5,
            min_frequency: 1,
            distance_weight: 0.6,
            frequency_weight: 0.4,
        }
    }
}

/// Ranks dictionary words as corrections for a misspelled word.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    dictionary: SpellingDictionary,
    config: SuggestionConfig,
}

impl SuggestionEngine {
    /// Create a new suggestion engine with the given dictionary.
    pub fn new(dictionary: SpellingDictionary) -> Self {
        SuggestionEngine {
            dictionary,
            config: SuggestionConfig::default(),
        }
    }

    /// Create a new suggestion engine with custom configuration.
    pub fn with_config(dictionary: SpellingDictionary, config: SuggestionConfig) -> Self {
        SuggestionEngine { dictionary, config }
    }

    /// Get suggestions for a potentially misspelled word.
    ///
    /// A word already in the dictionary is returned as its own single
    /// suggestion with score 1.0.
    pub fn suggest(&self, word: &str) -> Vec<Suggestion> {
        let word_lower = word.trim().to_lowercase();
        if word_lower.is_empty() {
            return Vec::new();
        }

        if self.dictionary.contains(&word_lower) {
            let frequency = self.dictionary.frequency(&word_lower);
            return vec![Suggestion::new(word_lower, 1.0, 0, frequency)];
        }

        let mut suggestions: Vec<Suggestion> = self
            .dictionary
            .iter()
            .filter(|(_, frequency)| *frequency >= self.config.min_frequency)
            .filter_map(|(candidate, frequency)| {
                let distance = transposition_distance_threshold(
                    &word_lower,
                    candidate,
                    self.config.max_distance,
                )?;
                let score = self.calculate_score(&word_lower, candidate, distance, frequency);
                Some(Suggestion::new(
                    candidate.to_string(),
                    score,
                    distance,
                    frequency,
                ))
            })
            .collect();

        suggestions.sort_by(Suggestion::rank);
        suggestions.truncate(self.config.max_suggestions);
        suggestions
    }

    /// Calculate a confidence score for a suggestion.
    fn calculate_score(
        &self,
        original: &str,
        candidate: &str,
        distance: usize,
        frequency: u32,
    ) -> f64 {
        // Distance score (closer distance = higher score)
        let distance_score = 1.0 / (1.0 + distance as f64);

        // Frequency score on a log scale so very common words do not dominate
        let total = self.dictionary.total_frequency() as f64;
        let frequency_score = if total <= 1.0 {
            0.0
        } else {
            (1.0 + frequency as f64).ln() / (1.0 + total).ln()
        };

        let length_penalty = if original.chars().count() == candidate.chars().count() {
            1.0
        } else {
            0.9
        };

        let base_score = distance_score * self.config.distance_weight
            + frequency_score * self.config.frequency_weight;

        (base_score * length_penalty * Self::prefix_bonus(original, candidate)).min(1.0)
    }

    /// Bonus from 1.0 (no common prefix) to 1.2 (identical prefix).
    fn prefix_bonus(original: &str, candidate: &str) -> f64 {
        let common_prefix_len = original
            .chars()
            .zip(candidate.chars())
            .take_while(|(a, b)| a == b)
            .count();

        let max_len = original.chars().count().max(candidate.chars().count());
        if max_len == 0 {
            return 1.0;
        }

        1.0 + (common_prefix_len as f64 / max_len as f64) * 0.2
    }

    /// Check if a word exists in the dictionary.
    pub fn is_correct(&self, word: &str) -> bool {
        self.dictionary.contains(word)
    }

    /// Get the underlying dictionary.
    pub fn dictionary(&self) -> &SpellingDictionary {
        &self.dictionary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SuggestionEngine {
        let mut dict = SpellingDictionary::new();
        dict.add_word("regex", 10);
        dict.add_word("reflex", 2);
        dict.add_word("query", 5);
        dict.add_word("queries", 1);
        SuggestionEngine::new(dict)
    }

    #[test]
    fn test_suggestion_ordering() {
        let mut suggestions = vec![
            Suggestion::new("hello".to_string(), 0.9, 1, 100),
            Suggestion::new("world".to_string(), 0.8, 1, 50),
            Suggestion::new("test".to_string(), 0.95, 0, 200),
        ];
        suggestions.sort_by(Suggestion::rank);

        assert_eq!(suggestions[0].word, "test");
        assert_eq!(suggestions[1].word, "hello");
        assert_eq!(suggestions[2].word, "world");
    }

    #[test]
    fn test_correct_word_returns_itself() {
        let suggestions = engine().suggest("Regex");
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].word, "regex");
        assert_eq!(suggestions[0].distance, 0);
        assert_eq!(suggestions[0].score, 1.0);
    }

    #[test]
    fn test_misspelling_prefers_closest_word() {
        let suggestions = engine().suggest("regx");
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].word, "regex");
        assert_eq!(suggestions[0].distance, 1);
        assert!(suggestions.iter().all(|s| s.distance <= 2));
    }

    #[test]
    fn test_no_candidates_within_distance() {
        assert!(engine().suggest("zzzzzzzz").is_empty());
        assert!(engine().suggest("   ").is_empty());
    }

    #[test]
    fn test_max_suggestions() {
        let config = SuggestionConfig {
            max_suggestions: 1,
            ..Default::default()
        };
        let dict = SpellingDictionary::from_words(["cat", "car", "cap"]);
        let engine = SuggestionEngine::with_config(dict, config);
        assert_eq!(engine.suggest("caz").len(), 1);
    }
}
