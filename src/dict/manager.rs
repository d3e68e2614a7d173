use crate::checker::lexicon::Lexicon;
use crate::dict::builder::{self, SegmentationOptions};
use crate::model::{CharTokenizer, LinearSegmenter};
use crate::Config;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

pub struct LexiconSummary {
    pub base_words: usize,
    pub total_entries: usize,
}

/// Build the lexicon described by `config` and write it to `output`.
pub fn build_lexicon(config: &Config, output: &Path, with_roots: bool) -> Result<LexiconSummary> {
    println!(
        "{} lexicon from {}...",
        "Building".cyan().bold(),
        config.data_dir.display().to_string().yellow()
    );

    let initial = builder::build_initial_lexicon(&config.data_dir, &config.sources)
        .context("Failed to read source tables")?;
    println!(
        "Found {} unique words in datasets",
        initial.len().to_string().yellow()
    );
    if initial.is_empty() {
        println!(
            "{} No words found; check `data_dir` and `sources` in your config",
            "!".yellow().bold()
        );
    }

    let words = if with_roots {
        let segmenter = LinearSegmenter::load_from_path(&config.segmentation_model)
            .with_context(|| {
                format!(
                    "Failed to load segmentation model {}",
                    config.segmentation_model.display()
                )
            })?;
        let tokenizer = CharTokenizer::fit(&initial, config.tokenizer);

        let pb = ProgressBar::new(initial.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} Predicting roots [{bar:30}] {pos}/{len}")
                .context("Invalid progress template")?,
        );

        let options = SegmentationOptions {
            threshold: config.segmentation_threshold,
            batch_size: config.batch_size,
        };
        builder::build_smart_lexicon(&initial, &segmenter, &tokenizer, options, &pb)
            .context("Failed to predict roots")?
    } else {
        initial.clone()
    };

    let lexicon = Lexicon::from_words(&words).context("Failed to build lexicon")?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    lexicon
        .save(output)
        .with_context(|| format!("Failed to write lexicon {}", output.display()))?;

    println!(
        "{} Lexicon created with {} entries: {}",
        "✓".green().bold(),
        lexicon.len().to_string().yellow(),
        output.display().to_string().cyan()
    );

    Ok(LexiconSummary {
        base_words: initial.len(),
        total_entries: lexicon.len(),
    })
}

pub fn show_info(path: &Path) -> Result<()> {
    if !path.exists() {
        println!(
            "{} Lexicon {} not found.",
            "✗".red().bold(),
            path.display().to_string().yellow()
        );
        println!("Run {} to create it.", "gujspell lexicon build".cyan());
        return Ok(());
    }

    let metadata = fs::metadata(path)?;

    println!("{}", "Lexicon".bold());
    println!("  Path: {}", path.display());
    println!("  Size: {} KB", metadata.len() / 1024);
    println!("  Format: FST (Finite State Transducer)");

    match Lexicon::load_from_path(path) {
        Ok(lexicon) => println!("  Entries: {}", lexicon.len()),
        Err(e) => println!("  {}: {}", "Error loading lexicon".red(), e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceTable;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> Config {
        Config {
            data_dir: dir.to_path_buf(),
            sources: vec![SourceTable::new("words.csv", "Word")],
            segmentation_model: dir.join("segmentation_model.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_without_roots() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("words.csv"), "Word\nઘર\nકામ\n").unwrap();
        let output = dir.path().join("out").join("lexicon.fst");

        let summary = build_lexicon(&config_in(dir.path()), &output, false).unwrap();
        assert_eq!(summary.base_words, 2);
        assert_eq!(summary.total_entries, 2);

        let lexicon = Lexicon::load_from_path(&output).unwrap();
        assert!(lexicon.contains("ઘર"));
        assert!(lexicon.contains("કામ"));
    }

    #[test]
    fn test_build_with_roots() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("words.csv"), "Word\nઘરમાં\n").unwrap();
        // ઘ, ર, મ, ા, ં each appear once; indices 1..=5 in first-seen order.
        // Post padding lines the probabilities up with the characters.
        fs::write(
            dir.path().join("segmentation_model.json"),
            r#"{"weights": [-9, -9, 9, -9, -9, -9], "bias": 0}"#,
        )
        .unwrap();
        let mut config = config_in(dir.path());
        config.tokenizer.padding = crate::model::Padding::Post;
        let output = dir.path().join("lexicon.fst");

        let summary = build_lexicon(&config, &output, true).unwrap();
        assert_eq!(summary.total_entries, 2);
        assert!(Lexicon::load_from_path(&output).unwrap().contains("ઘર"));
    }

    #[test]
    fn test_build_with_missing_segmenter_fails() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("lexicon.fst");
        assert!(build_lexicon(&config_in(dir.path()), &output, true).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_show_info_missing() {
        let dir = tempdir().unwrap();
        show_info(&dir.path().join("nope.fst")).unwrap();
    }
}
