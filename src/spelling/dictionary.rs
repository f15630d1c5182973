//! Word frequency dictionaries for spelling correction.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;

use crate::error::Result;

/// A dictionary that stores words and their frequencies.
#[derive(Debug, Clone, Default)]
pub struct SpellingDictionary {
    /// Words and their frequencies
    words: AHashMap<String, u32>,
    /// Total word count for probability calculations
    total_count: u64,
}

impl SpellingDictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        SpellingDictionary {
            words: AHashMap::new(),
            total_count: 0,
        }
    }

    /// Build a dictionary from a list of words, each with frequency 1.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = SpellingDictionary::new();
        for word in words {
            dictionary.increment_word(word.as_ref());
        }
        dictionary
    }

    /// Set a word's frequency, replacing any previous value.
    pub fn add_word(&mut self, word: &str, frequency: u32) {
        let normalized = word.trim().to_lowercase();
        if normalized.is_empty() {
            return;
        }

        let old_freq = self.words.insert(normalized, frequency).unwrap_or(0);
        self.total_count = self.total_count - old_freq as u64 + frequency as u64;
    }

    /// Increment the frequency of a word by 1.
    pub fn increment_word(&mut self, word: &str) {
        let current = self.frequency(word);
        self.add_word(word, current.saturating_add(1));
    }

    /// Check if a word exists in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&word.to_lowercase())
    }

    /// Get the frequency of a word.
    pub fn frequency(&self, word: &str) -> u32 {
        self.words.get(&word.to_lowercase()).copied().unwrap_or(0)
    }

    /// Iterate over all words and their frequencies, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.words.iter().map(|(word, freq)| (word.as_str(), *freq))
    }

    /// Get the total number of unique words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Get the total frequency count.
    pub fn total_frequency(&self) -> u64 {
        self.total_count
    }

    /// Load dictionary from a text file with one word per line.
    ///
    /// Lines containing anything but alphabetic characters are skipped.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut dictionary = SpellingDictionary::new();
        let reader = BufReader::new(File::open(path)?);

        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() && word.chars().all(|c| c.is_alphabetic()) {
                dictionary.increment_word(word);
            }
        }

        Ok(dictionary)
    }

    /// Load dictionary from a frequency file with format "word frequency" per line.
    pub fn load_from_frequency_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut dictionary = SpellingDictionary::new();
        let reader = BufReader::new(File::open(path)?);

        for line in reader.lines() {
            let line = line?;
            let mut parts = line.split_whitespace();

            if let (Some(word), Some(frequency)) = (parts.next(), parts.next())
                && let Ok(frequency) = frequency.parse::<u32>()
                && word.chars().all(|c| c.is_alphabetic())
            {
                dictionary.add_word(word, frequency);
            }
        }

        Ok(dictionary)
    }
}
