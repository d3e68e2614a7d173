use crate::error::{Error, Result};
use crate::model::{check_rows, CharTokenizer, Distribution, ModelEnsemble, MorphScorer};

pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Re-order candidates by morphological plausibility for `pos_tag`.
///
/// Tags without a scorer in `models` pass the candidates through untouched.
/// Scorer failures come back as [`Error::Scorer`] naming `pos_tag`.
pub fn rank(
    candidates: Vec<String>,
    pos_tag: &str,
    tokenizer: &CharTokenizer,
    models: &ModelEnsemble,
    epsilon: f64,
) -> Result<Vec<String>> {
    let Some(scorer) = models.get(pos_tag) else {
        log::debug!("no scorer for {:?}, keeping distance order", pos_tag);
        return Ok(candidates);
    };
    if candidates.is_empty() {
        return Ok(candidates);
    }

    let scores = score(&candidates, scorer, tokenizer, epsilon).map_err(|e| match e {
        Error::Scorer { .. } => e,
        other => Error::Scorer {
            tag: pos_tag.to_string(),
            message: other.to_string(),
        },
    })?;

    let mut scored: Vec<(String, f64)> = candidates.into_iter().zip(scores).collect();
    // stable, so equal scores keep distance order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(scored.into_iter().map(|(word, _)| word).collect())
}

/// Sum over heads of `ln(max probability + epsilon)`, one value per candidate.
pub fn score(
    candidates: &[String],
    scorer: &dyn MorphScorer,
    tokenizer: &CharTokenizer,
    epsilon: f64,
) -> Result<Vec<f64>> {
    let batch = tokenizer.encode_batch(candidates);
    let outputs = scorer.predict(&batch)?;
    check_rows(batch.len(), outputs.len())?;

    Ok(outputs
        .iter()
        .map(|heads| heads.iter().map(|head| head_score(head, epsilon)).sum::<f64>())
        .collect())
}

fn head_score(head: &Distribution, epsilon: f64) -> f64 {
    let max = head.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let max = if max.is_finite() { max as f64 } else { 0.0 };
    (max + epsilon).ln()
}
