//! Offline lexicon construction from tabular linguistic data.

use crate::checker::normalize::normalize;
use crate::config::SourceTable;
use crate::error::{Error, Result};
use crate::model::{check_rows, CharTokenizer, SegmentationScorer};
use indicatif::ProgressBar;
use std::collections::BTreeSet;
use std::path::Path;

pub const DEFAULT_SEGMENTATION_THRESHOLD: f32 = 0.5;
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Union the word columns of every source table under `data_dir`.
///
/// Missing files and missing columns are skipped with a warning so a
/// partial corpus still yields a lexicon.
pub fn build_initial_lexicon(data_dir: &Path, sources: &[SourceTable]) -> Result<BTreeSet<String>> {
    let mut words = BTreeSet::new();

    for source in sources {
        let path = data_dir.join(&source.file);
        if !path.exists() {
            log::warn!("Skipping missing source table {}", path.display());
            continue;
        }

        let before = words.len();
        read_column(&path, &source.column, &mut words)?;
        log::info!(
            "{}: {} new words from column {:?}",
            path.display(),
            words.len() - before,
            source.column
        );
    }

    Ok(words)
}

fn read_column(path: &Path, column: &str, words: &mut BTreeSet<String>) -> Result<()> {
    let table_err = |source| Error::Table {
        path: path.to_path_buf(),
        source,
    };

    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") | Some("tab") => b'\t',
        _ => b',',
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(table_err)?;

    let headers = rdr.headers().map_err(table_err)?;
    let Some(index) = headers.iter().position(|h| h.trim() == column) else {
        log::warn!("Skipping {}: no column {:?}", path.display(), column);
        return Ok(());
    };

    for record in rdr.records() {
        let record = record.map_err(table_err)?;
        match record.get(index) {
            Some(value) if !value.trim().is_empty() => {
                words.insert(normalize(value));
            }
            _ => {}
        }
    }

    Ok(())
}

/// Tunables for root enrichment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentationOptions {
    pub threshold: f32,
    pub batch_size: usize,
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SEGMENTATION_THRESHOLD,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Add a predicted root for every base word.
///
/// Scorer calls are batched by `options.batch_size` and `progress` is
/// advanced by one per word.
pub fn build_smart_lexicon(
    base: &BTreeSet<String>,
    scorer: &dyn SegmentationScorer,
    tokenizer: &CharTokenizer,
    options: SegmentationOptions,
    progress: &ProgressBar,
) -> Result<BTreeSet<String>> {
    let base_words: Vec<&String> = base.iter().collect();
    let max_len = tokenizer.config().max_len;
    let mut lexicon = base.clone();

    progress.set_length(base_words.len() as u64);
    for chunk in base_words.chunks(options.batch_size.max(1)) {
        let batch = tokenizer.encode_batch(chunk);
        let predictions = scorer.predict(&batch)?;
        check_rows(batch.len(), predictions.len())?;

        for (word, boundaries) in chunk.iter().zip(&predictions) {
            let root = predict_root(word, boundaries, max_len, options.threshold);
            if !root.is_empty() {
                lexicon.insert(root);
            }
        }
        progress.inc(chunk.len() as u64);
    }
    progress.finish_and_clear();

    log::info!(
        "{} base words, {} entries after adding roots",
        base.len(),
        lexicon.len()
    );
    Ok(lexicon)
}

/// Accumulate characters up to and including the first one whose boundary
/// probability exceeds `threshold`. Probability `j` belongs to character
/// `j`; only the first `max_len` characters are considered.
pub fn predict_root(word: &str, boundaries: &[f32], max_len: usize, threshold: f32) -> String {
    let mut root = String::new();
    for (j, ch) in word.chars().take(max_len).enumerate() {
        root.push(ch);
        if boundaries.get(j).copied().unwrap_or(0.0) > threshold {
            break;
        }
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Encoded, TokenizerConfig};
    use std::fs;
    use tempfile::tempdir;

    /// Marks a boundary after the second position of every row.
    struct SecondChar;

    impl SegmentationScorer for SecondChar {
        fn predict(&self, batch: &[Encoded]) -> Result<Vec<Vec<f32>>> {
            Ok(batch
                .iter()
                .map(|row| {
                    (0..row.len())
                        .map(|i| if i == 1 { 0.9 } else { 0.1 })
                        .collect()
                })
                .collect())
        }
    }

    struct Failing;

    impl SegmentationScorer for Failing {
        fn predict(&self, _batch: &[Encoded]) -> Result<Vec<Vec<f32>>> {
            Err(Error::InvalidInput("no model".to_string()))
        }
    }

    fn sources() -> Vec<SourceTable> {
        vec![
            SourceTable::new("morph_tagging_noun.csv", "Word"),
            SourceTable::new("morph_tagging_verb.tsv", "Verb Form"),
            SourceTable::new("missing.csv", "Word"),
            SourceTable::new("other.csv", "Lemma"),
        ]
    }

    #[test]
    fn test_initial_lexicon_from_tables() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("morph_tagging_noun.csv"),
            "Word,Tag\nઘર,N\n,N\nબાળક,N\nઘર,N\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("morph_tagging_verb.tsv"),
            "Root\tVerb Form\nકર\tકરવું\nજા\tજાય\n",
        )
        .unwrap();
        fs::write(dir.path().join("other.csv"), "Word\nકામ\n").unwrap();

        let words = build_initial_lexicon(dir.path(), &sources()).unwrap();
        let expected: BTreeSet<String> = ["ઘર", "બાળક", "કરવું", "જાય"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn test_all_sources_missing() {
        let dir = tempdir().unwrap();
        let words = build_initial_lexicon(dir.path(), &sources()).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn test_predict_root() {
        assert_eq!(predict_root("ઘરમાં", &[0.1, 0.9, 0.9], 20, 0.5), "ઘર");
        assert_eq!(predict_root("ઘરમાં", &[0.1; 5], 20, 0.5), "ઘરમાં");
        assert_eq!(predict_root("ઘરમાં", &[0.5; 5], 20, 0.5), "ઘરમાં");
        assert_eq!(predict_root("ઘરમાં", &[0.1; 5], 3, 0.5), "ઘરમ");
        assert_eq!(predict_root("ઘરમાં", &[0.6], 20, 0.5), "ઘ");
    }

    #[test]
    fn test_smart_lexicon_adds_roots() {
        let base: BTreeSet<String> = ["ઘરમાં", "કામનું", "ઘ"].iter().map(|s| s.to_string()).collect();
        let tokenizer = CharTokenizer::fit(&base, TokenizerConfig::default());
        let options = SegmentationOptions {
            threshold: 0.5,
            batch_size: 2,
        };

        let lexicon =
            build_smart_lexicon(&base, &SecondChar, &tokenizer, options, &ProgressBar::hidden())
                .unwrap();

        assert!(lexicon.is_superset(&base));
        assert!(lexicon.contains("ઘર"));
        assert!(lexicon.contains("કા"));
        assert_eq!(lexicon.len(), base.len() + 2);
    }

    #[test]
    fn test_smart_lexicon_propagates_scorer_error() {
        let base: BTreeSet<String> = ["ઘર"].iter().map(|s| s.to_string()).collect();
        let tokenizer = CharTokenizer::fit(&base, TokenizerConfig::default());
        let result = build_smart_lexicon(
            &base,
            &Failing,
            &tokenizer,
            SegmentationOptions::default(),
            &ProgressBar::hidden(),
        );
        assert!(result.is_err());
    }
}
