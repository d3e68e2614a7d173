pub mod linear;
pub mod tokenizer;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use linear::{LinearScorer, LinearSegmenter};
pub use tokenizer::{CharTokenizer, Padding, TokenizerConfig};

/// An encoded word: one index per position, 0 is padding.
pub type Encoded = Vec<u32>;

/// Probabilities for one output head.
pub type Distribution = Vec<f32>;

/// Parts of speech the shipped ensemble knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 3] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
        }
    }
}

impl FromStr for PartOfSpeech {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "noun" => Ok(PartOfSpeech::Noun),
            "verb" => Ok(PartOfSpeech::Verb),
            "adjective" => Ok(PartOfSpeech::Adjective),
            _ => Err(format!("Unknown part of speech: {}", s)),
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A part-of-speech classifier used to re-rank candidates.
pub trait MorphScorer: Send + Sync {
    /// For each input row, one probability distribution per output head.
    fn predict(&self, batch: &[Encoded]) -> Result<Vec<Vec<Distribution>>>;
}

/// Predicts a morpheme boundary probability at each position.
pub trait SegmentationScorer: Send + Sync {
    fn predict(&self, batch: &[Encoded]) -> Result<Vec<Vec<f32>>>;
}

/// Tag-to-scorer capability map. Immutable once built.
#[derive(Default)]
pub struct ModelEnsemble {
    scorers: HashMap<String, Box<dyn MorphScorer>>,
}

impl ModelEnsemble {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scorer(mut self, tag: impl Into<String>, scorer: Box<dyn MorphScorer>) -> Self {
        self.scorers.insert(tag.into(), scorer);
        self
    }

    /// Load one [`LinearScorer`] per configured tag.
    pub fn load(paths: &BTreeMap<String, PathBuf>) -> Result<Self> {
        let mut ensemble = Self::new();
        for (tag, path) in paths {
            let scorer = LinearScorer::load_from_path(path)?;
            log::info!("Loaded {} scorer from {}", tag, path.display());
            ensemble = ensemble.with_scorer(tag.as_str(), Box::new(scorer));
        }
        Ok(ensemble)
    }

    pub fn get(&self, tag: &str) -> Option<&dyn MorphScorer> {
        self.scorers.get(tag).map(|s| s.as_ref())
    }

    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.scorers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }
}

impl fmt::Debug for ModelEnsemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEnsemble")
            .field("tags", &self.tags())
            .finish()
    }
}

pub(crate) fn check_rows(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(Error::Shape { expected, got });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant;

    impl MorphScorer for Constant {
        fn predict(&self, batch: &[Encoded]) -> Result<Vec<Vec<Distribution>>> {
            Ok(batch.iter().map(|_| vec![vec![1.0]]).collect())
        }
    }

    #[test]
    fn test_part_of_speech_parsing() {
        assert_eq!("noun".parse::<PartOfSpeech>(), Ok(PartOfSpeech::Noun));
        assert_eq!("Verb".parse::<PartOfSpeech>(), Ok(PartOfSpeech::Verb));
        assert!("adverb".parse::<PartOfSpeech>().is_err());
        for pos in PartOfSpeech::ALL {
            assert_eq!(pos.to_string().parse::<PartOfSpeech>(), Ok(pos));
        }
    }

    #[test]
    fn test_ensemble_lookup() {
        let ensemble = ModelEnsemble::new()
            .with_scorer("noun", Box::new(Constant))
            .with_scorer("particle", Box::new(Constant));
        assert!(ensemble.get("noun").is_some());
        assert!(ensemble.get("particle").is_some());
        assert!(ensemble.get("verb").is_none());
        assert_eq!(ensemble.tags(), vec!["noun", "particle"]);
    }

    #[test]
    fn test_load_missing_model_fails() {
        let mut paths = BTreeMap::new();
        paths.insert("noun".to_string(), PathBuf::from("/nonexistent/noun_model.json"));
        assert!(ModelEnsemble::load(&paths).is_err());
    }
}
