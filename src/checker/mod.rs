pub mod lexicon;
pub mod normalize;
pub mod ranker;
pub mod suggestions;

use crate::error::Result;
use crate::model::{CharTokenizer, ModelEnsemble};
use crate::{Config, Verdict};
use anyhow::Context;
use lexicon::Lexicon;
use normalize::normalize;

/// Tunables for a single check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckOptions {
    pub max_distance: usize,
    pub max_candidates: usize,
    pub epsilon: f64,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            max_distance: suggestions::DEFAULT_MAX_DISTANCE,
            max_candidates: suggestions::DEFAULT_MAX_CANDIDATES,
            epsilon: ranker::DEFAULT_EPSILON,
        }
    }
}

impl From<&Config> for CheckOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_distance: config.max_distance,
            max_candidates: config.max_candidates,
            epsilon: config.epsilon,
        }
    }
}

/// Everything a check needs, loaded once and never mutated afterwards.
///
/// Shared references are safe across threads; every method takes `&self`.
#[derive(Debug)]
pub struct SpellChecker {
    lexicon: Lexicon,
    tokenizer: CharTokenizer,
    models: ModelEnsemble,
    options: CheckOptions,
}

impl SpellChecker {
    /// Load the lexicon and models named in `config`. The tokenizer is
    /// fitted over the loaded lexicon.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let lexicon = Lexicon::load_from_path(&config.lexicon).with_context(|| {
            format!(
                "Failed to load lexicon {}. Run `gujspell lexicon build` first",
                config.lexicon.display()
            )
        })?;

        let models = ModelEnsemble::load(&config.models).context("Failed to load models")?;

        let tokenizer = CharTokenizer::fit(lexicon.words(), config.tokenizer);

        Ok(Self::from_parts(
            lexicon,
            tokenizer,
            models,
            CheckOptions::from(config),
        ))
    }

    pub fn from_parts(
        lexicon: Lexicon,
        tokenizer: CharTokenizer,
        models: ModelEnsemble,
        options: CheckOptions,
    ) -> Self {
        Self {
            lexicon,
            tokenizer,
            models,
            options,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn tokenizer(&self) -> &CharTokenizer {
        &self.tokenizer
    }

    pub fn models(&self) -> &ModelEnsemble {
        &self.models
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Check one word.
    ///
    /// The verdict echoes `word` as given, not its normalized form.
    pub fn check(&self, word: &str, pos_tag: &str) -> Result<Verdict> {
        let cleaned = normalize(word);

        if self.lexicon.contains(&cleaned) {
            return Ok(Verdict {
                word: word.to_string(),
                correct: true,
                suggestions: vec![cleaned],
            });
        }

        let candidates = suggestions::generate(
            word,
            &self.lexicon,
            self.options.max_distance,
            self.options.max_candidates,
        );
        if candidates.is_empty() {
            return Ok(Verdict {
                word: word.to_string(),
                correct: false,
                suggestions: Vec::new(),
            });
        }

        let ranked = ranker::rank(
            candidates,
            pos_tag,
            &self.tokenizer,
            &self.models,
            self.options.epsilon,
        )?;

        Ok(Verdict {
            word: word.to_string(),
            correct: false,
            suggestions: ranked,
        })
    }
}
