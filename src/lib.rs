//! Gujarati spelling suggestions.
//!
//! A word is normalized, looked up in a fixed [`Lexicon`], and on a miss
//! the lexicon is scanned for entries within a small edit distance. Those
//! candidates are then re-ranked by a part-of-speech specific
//! [`MorphScorer`] when one is available.
//!
//! ```no_run
//! use gujspell::{Config, SpellChecker};
//!
//! let checker = SpellChecker::new(&Config::default())?;
//! let verdict = checker.check("ઘપ", "noun")?;
//! println!("{} -> {:?}", verdict.word, verdict.suggestions);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod model;

pub use checker::lexicon::Lexicon;
pub use checker::{CheckOptions, SpellChecker};
pub use config::Config;
pub use error::{Error, Result};
pub use model::{CharTokenizer, ModelEnsemble, MorphScorer, PartOfSpeech, SegmentationScorer};

use serde::{Deserialize, Serialize};

/// Outcome of checking one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The word exactly as the caller passed it.
    pub word: String,
    pub correct: bool,
    /// For a correct word, its normalized form. Otherwise ranked
    /// corrections, possibly empty.
    pub suggestions: Vec<String>,
}
