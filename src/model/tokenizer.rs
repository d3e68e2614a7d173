use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_VOCAB_SIZE: usize = 200;
pub const DEFAULT_MAX_LEN: usize = 20;

/// Which end of a sequence receives padding and loses symbols on truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    #[default]
    Pre,
    Post,
}

impl FromStr for Padding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pre" => Ok(Padding::Pre),
            "post" => Ok(Padding::Post),
            _ => Err(format!("Unknown padding: {}", s)),
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Padding::Pre => write!(f, "pre"),
            Padding::Post => write!(f, "post"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub vocab_size: usize,
    pub max_len: usize,
    pub lower: bool,
    pub padding: Padding,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            vocab_size: DEFAULT_VOCAB_SIZE,
            max_len: DEFAULT_MAX_LEN,
            lower: true,
            padding: Padding::Pre,
        }
    }
}

/// Character-level tokenizer.
///
/// Indices start at 1 and follow descending character frequency over the
/// fitted words (ties by first appearance); 0 is reserved for padding.
/// Only the `vocab_size - 1` most frequent characters are ever emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharTokenizer {
    config: TokenizerConfig,
    index: HashMap<char, u32>,
}

impl CharTokenizer {
    pub fn fit<I, S>(words: I, config: TokenizerConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: Vec<(char, usize)> = Vec::new();
        let mut position: HashMap<char, usize> = HashMap::new();

        for word in words {
            for ch in Self::prepare(word.as_ref(), config.lower) {
                match position.get(&ch) {
                    Some(&i) => counts[i].1 += 1,
                    None => {
                        position.insert(ch, counts.len());
                        counts.push((ch, 1));
                    }
                }
            }
        }

        // stable: equal counts keep first-appearance order
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let index = counts
            .into_iter()
            .enumerate()
            .map(|(i, (ch, _))| (ch, i as u32 + 1))
            .collect();

        Self { config, index }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Number of distinct characters seen while fitting.
    pub fn known_chars(&self) -> usize {
        self.index.len()
    }

    pub fn index_of(&self, ch: char) -> Option<u32> {
        self.index.get(&ch).copied()
    }

    /// Map a word to indices without padding. Unknown and out-of-vocabulary
    /// characters are dropped.
    pub fn sequence(&self, word: &str) -> Vec<u32> {
        let limit = self.config.vocab_size as u32;
        Self::prepare(word, self.config.lower)
            .filter_map(|ch| self.index.get(&ch).copied())
            .filter(|&i| i < limit)
            .collect()
    }

    /// Map a word to exactly `max_len` indices.
    pub fn encode(&self, word: &str) -> Vec<u32> {
        let seq = self.sequence(word);
        let max_len = self.config.max_len;

        let seq = if seq.len() > max_len {
            match self.config.padding {
                Padding::Pre => seq[seq.len() - max_len..].to_vec(),
                Padding::Post => seq[..max_len].to_vec(),
            }
        } else {
            seq
        };

        let fill = std::iter::repeat(0).take(max_len - seq.len());
        match self.config.padding {
            Padding::Pre => fill.chain(seq).collect(),
            Padding::Post => seq.into_iter().chain(fill).collect(),
        }
    }

    pub fn encode_batch<S: AsRef<str>>(&self, words: &[S]) -> Vec<Vec<u32>> {
        words.iter().map(|w| self.encode(w.as_ref())).collect()
    }

    fn prepare(word: &str, lower: bool) -> Box<dyn Iterator<Item = char> + '_> {
        if lower {
            Box::new(word.chars().flat_map(char::to_lowercase))
        } else {
            Box::new(word.chars())
        }
    }
}
