//! File-backed scorers with a bag-of-characters linear layer.
//!
//! Weight files are JSON. A morphological scorer has one or more heads:
//!
//! ```json
//! { "heads": [ { "weights": [[0.0, 0.0], [0.3, -0.1]], "bias": [0.0, 0.0] } ] }
//! ```
//!
//! `weights[token][class]`; row 0 belongs to the padding index and is
//! never read. A segmenter has a single weight per token and a bias:
//!
//! ```json
//! { "weights": [0.0, 1.2, -0.4], "bias": -0.5 }
//! ```

use super::{Distribution, Encoded, MorphScorer, SegmentationScorer};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Head {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl Head {
    fn classes(&self) -> usize {
        self.bias.len()
    }

    fn distribution(&self, row: &[u32]) -> Result<Distribution> {
        let mut logits = self.bias.clone();
        for &token in row.iter().filter(|&&t| t != 0) {
            let weights = self.weights.get(token as usize).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "token {} outside a vocabulary of {}",
                    token,
                    self.weights.len()
                ))
            })?;
            for (logit, w) in logits.iter_mut().zip(weights) {
                *logit += w;
            }
        }
        Ok(softmax(&logits))
    }
}

/// Multi-head softmax classifier over the characters of a word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearScorer {
    pub heads: Vec<Head>,
}

impl LinearScorer {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let scorer: Self = serde_json::from_str(&content).map_err(|e| Error::ModelFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        scorer.validate().map_err(|message| Error::ModelFormat {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(scorer)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.heads.is_empty() {
            return Err("no output heads".to_string());
        }
        for (i, head) in self.heads.iter().enumerate() {
            if head.classes() == 0 {
                return Err(format!("head {} has no classes", i));
            }
            if let Some(row) = head.weights.iter().position(|r| r.len() != head.classes()) {
                return Err(format!(
                    "head {} row {} has {} weights, expected {}",
                    i,
                    row,
                    head.weights[row].len(),
                    head.classes()
                ));
            }
        }
        Ok(())
    }
}

impl MorphScorer for LinearScorer {
    fn predict(&self, batch: &[Encoded]) -> Result<Vec<Vec<Distribution>>> {
        batch
            .iter()
            .map(|row| {
                self.heads
                    .iter()
                    .map(|h| h.distribution(row))
                    .collect::<Result<Vec<Distribution>>>()
            })
            .collect()
    }
}

/// Per-position boundary classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSegmenter {
    pub weights: Vec<f32>,
    pub bias: f32,
}

impl LinearSegmenter {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| Error::ModelFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl SegmentationScorer for LinearSegmenter {
    fn predict(&self, batch: &[Encoded]) -> Result<Vec<Vec<f32>>> {
        batch
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&token| -> Result<f32> {
                        let w = self.weights.get(token as usize).copied().ok_or_else(|| {
                            Error::InvalidInput(format!(
                                "token {} outside a vocabulary of {}",
                                token,
                                self.weights.len()
                            ))
                        })?;
                        Ok(sigmoid(self.bias + w))
                    })
                    .collect::<Result<Vec<f32>>>()
            })
            .collect()
    }
}

fn softmax(logits: &[f32]) -> Distribution {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let dist = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = dist.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(dist[2] > dist[1] && dist[1] > dist[0]);
    }

    #[test]
    fn test_scorer_predicts_per_head() {
        let file = write_json(
            r#"{"heads": [
                {"weights": [[0, 0], [2, 0], [0, 2]], "bias": [0, 0]},
                {"weights": [[0, 0, 0], [0, 0, 0], [0, 0, 0]], "bias": [0, 0, 0]}
            ]}"#,
        );
        let scorer = LinearScorer::load_from_path(file.path()).unwrap();
        let out = scorer.predict(&[vec![0, 0, 1], vec![0, 2, 2]]).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 2);
        assert!(out[0][0][0] > out[0][0][1]);
        assert!(out[1][0][1] > out[1][0][0]);
        assert_eq!(out[0][1].len(), 3);
        assert!((out[0][1][0] - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_scorer_rejects_unknown_token() {
        let file = write_json(r#"{"heads": [{"weights": [[0], [1]], "bias": [0]}]}"#);
        let scorer = LinearScorer::load_from_path(file.path()).unwrap();
        let err = scorer.predict(&[vec![0, 5]]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_scorer_rejects_ragged_weights() {
        let file = write_json(r#"{"heads": [{"weights": [[0, 1], [1]], "bias": [0, 0]}]}"#);
        let err = LinearScorer::load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, Error::ModelFormat { .. }));

        let file = write_json(r#"{"heads": []}"#);
        assert!(LinearScorer::load_from_path(file.path()).is_err());

        let file = write_json("not json");
        assert!(LinearScorer::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_segmenter_probabilities() {
        let file = write_json(r#"{"weights": [0.0, 10.0, -10.0], "bias": 0.0}"#);
        let seg = LinearSegmenter::load_from_path(file.path()).unwrap();
        let out = seg.predict(&[vec![0, 1, 2]]).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0][0] - 0.5).abs() < 1e-6);
        assert!(out[0][1] > 0.99);
        assert!(out[0][2] < 0.01);
    }
}
