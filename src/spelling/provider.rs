//! Sources of the reference dictionary.
//!
//! Loading a dictionary may be slow (large word lists, remote storage), so the
//! coordinator always calls [`DictionaryProvider::load`] off the request path.

use std::fmt::Debug;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FathomError, Result};
use crate::spelling::dictionary::SpellingDictionary;

/// Supplies the reference dictionary used to build spelling models.
pub trait DictionaryProvider: Send + Sync + Debug {
    /// Load the dictionary. Failures map to `DictionaryLoadFailure`.
    fn load(&self) -> Result<SpellingDictionary>;
}

/// On-disk dictionary layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryFormat {
    /// One word per line.
    #[default]
    WordList,
    /// "word frequency" per line.
    Frequency,
}

/// A dictionary read from a file on every load.
#[derive(Debug, Clone)]
pub struct FileDictionary {
    path: PathBuf,
    format: DictionaryFormat,
}

impl FileDictionary {
    pub fn new<P: Into<PathBuf>>(path: P, format: DictionaryFormat) -> Self {
        FileDictionary {
            path: path.into(),
            format,
        }
    }
}

impl DictionaryProvider for FileDictionary {
    fn load(&self) -> Result<SpellingDictionary> {
        let loaded = match self.format {
            DictionaryFormat::WordList => SpellingDictionary::load_from_file(&self.path),
            DictionaryFormat::Frequency => SpellingDictionary::load_from_frequency_file(&self.path),
        };

        loaded.map_err(|e| {
            FathomError::dictionary(format!(
                "failed to load '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// An in-memory dictionary, cloned on every load.
#[derive(Debug, Clone, Default)]
pub struct StaticDictionary {
    dictionary: SpellingDictionary,
}

impl StaticDictionary {
    pub fn new(dictionary: SpellingDictionary) -> Self {
        StaticDictionary { dictionary }
    }

    /// A provider that knows no words; models then contain only the vocabulary.
    pub fn empty() -> Self {
        StaticDictionary::default()
    }
}

impl DictionaryProvider for StaticDictionary {
    fn load(&self) -> Result<SpellingDictionary> {
        Ok(self.dictionary.clone())
    }
}
