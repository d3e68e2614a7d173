use crate::model::{PartOfSpeech, TokenizerConfig};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = ".gujspell.toml";

/// A tabular source for the lexicon builder: file name under `data_dir`
/// and the column holding word forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    pub file: String,
    pub column: String,
}

impl SourceTable {
    pub fn new(file: &str, column: &str) -> Self {
        Self {
            file: file.to_string(),
            column: column.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub lexicon: PathBuf,
    pub models: BTreeMap<String, PathBuf>,
    pub segmentation_model: PathBuf,
    pub data_dir: PathBuf,
    pub sources: Vec<SourceTable>,
    pub max_distance: usize,
    pub max_candidates: usize,
    /// How many suggestions the CLI prints.
    pub max_suggestions: usize,
    pub tokenizer: TokenizerConfig,
    pub epsilon: f64,
    pub segmentation_threshold: f32,
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lexicon: PathBuf::from("gujarati_lexicon.fst"),
            models: PartOfSpeech::ALL
                .iter()
                .map(|pos| (pos.to_string(), PathBuf::from(format!("{}_model.json", pos))))
                .collect(),
            segmentation_model: PathBuf::from("segmentation_model.json"),
            data_dir: PathBuf::from("morphdata"),
            sources: vec![
                SourceTable::new("morph_segmentation.csv", "Word"),
                SourceTable::new("morph_tagging_noun.csv", "Word"),
                SourceTable::new("morph_tagging_verb.csv", "Verb Form"),
                SourceTable::new("morph_tagging_adjective.csv", "Word"),
            ],
            max_distance: crate::checker::suggestions::DEFAULT_MAX_DISTANCE,
            max_candidates: crate::checker::suggestions::DEFAULT_MAX_CANDIDATES,
            max_suggestions: 6,
            tokenizer: TokenizerConfig::default(),
            epsilon: crate::checker::ranker::DEFAULT_EPSILON,
            segmentation_threshold: crate::dict::builder::DEFAULT_SEGMENTATION_THRESHOLD,
            batch_size: crate::dict::builder::DEFAULT_BATCH_SIZE,
        }
    }
}

/// On-disk configuration. Every key is optional and only overrides what
/// it names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub lexicon: Option<PathBuf>,
    pub models: Option<BTreeMap<String, PathBuf>>,
    pub segmentation_model: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub sources: Option<Vec<SourceTable>>,
    pub max_distance: Option<usize>,
    pub max_candidates: Option<usize>,
    pub max_suggestions: Option<usize>,
    pub tokenizer: Option<TokenizerConfig>,
    pub epsilon: Option<f64>,
    pub segmentation_threshold: Option<f32>,
    pub batch_size: Option<usize>,
}

impl Config {
    /// Load configuration with priority: explicit file > local config >
    /// global config > defaults. CLI flags are applied by the caller.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = config.merge(Self::from_file(&global_path)?);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            config = config.merge(Self::from_file(&local_path)?);
        }

        if let Some(path) = explicit {
            config = config.merge(Self::from_file(path)?);
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<ConfigFile> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::info!("Using config file {}", path.display());
        Ok(file)
    }

    pub fn merge(mut self, other: ConfigFile) -> Self {
        if let Some(v) = other.lexicon {
            self.lexicon = v;
        }
        if let Some(v) = other.models {
            self.models = v;
        }
        if let Some(v) = other.segmentation_model {
            self.segmentation_model = v;
        }
        if let Some(v) = other.data_dir {
            self.data_dir = v;
        }
        if let Some(v) = other.sources {
            self.sources = v;
        }
        if let Some(v) = other.max_distance {
            self.max_distance = v;
        }
        if let Some(v) = other.max_candidates {
            self.max_candidates = v;
        }
        if let Some(v) = other.max_suggestions {
            self.max_suggestions = v;
        }
        if let Some(v) = other.tokenizer {
            self.tokenizer = v;
        }
        if let Some(v) = other.epsilon {
            self.epsilon = v;
        }
        if let Some(v) = other.segmentation_threshold {
            self.segmentation_threshold = v;
        }
        if let Some(v) = other.batch_size {
            self.batch_size = v;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gujspell").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
