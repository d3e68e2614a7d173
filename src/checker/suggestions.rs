use crate::checker::lexicon::Lexicon;
use crate::checker::normalize::normalize;

pub const DEFAULT_MAX_DISTANCE: usize = 2;
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// A lexicon entry within edit distance of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub word: String,
    pub distance: usize,
}

/// Generate spelling candidates using edit distance.
///
/// An exact lexicon hit short-circuits to a single-element result.
/// Otherwise the whole lexicon is scanned: entries whose length (in
/// characters) is more than `max_distance` away are skipped before the
/// Levenshtein computation. Results are ordered by ascending distance, ties
/// broken lexicographically, and capped at `max_candidates`.
///
/// The scan is linear in the lexicon size. Large lexicons would need an
/// index (BK-tree, n-gram) in front of this.
pub fn generate(
    word: &str,
    lexicon: &Lexicon,
    max_distance: usize,
    max_candidates: usize,
) -> Vec<String> {
    candidates(word, lexicon, max_distance, max_candidates)
        .into_iter()
        .map(|c| c.word)
        .collect()
}

/// Same as [`generate`] but keeps the distances.
pub fn candidates(
    word: &str,
    lexicon: &Lexicon,
    max_distance: usize,
    max_candidates: usize,
) -> Vec<Candidate> {
    let cleaned = normalize(word);
    if lexicon.contains(&cleaned) {
        let mut exact = vec![Candidate {
            word: cleaned,
            distance: 0,
        }];
        exact.truncate(max_candidates);
        return exact;
    }

    let word_len = cleaned.chars().count();
    let min_len = word_len.saturating_sub(max_distance);
    let max_len = word_len + max_distance;

    let mut found = Vec::new();
    lexicon.scan(|entry| {
        let entry_len = entry.chars().count();
        if entry_len < min_len || entry_len > max_len {
            return;
        }
        let distance = edit_distance(&cleaned, entry);
        if distance <= max_distance {
            found.push(Candidate {
                word: entry.to_string(),
                distance,
            });
        }
    });

    // scan order is lexicographic, so a stable sort keeps ties in that order
    found.sort_by_key(|c| c.distance);
    found.truncate(max_candidates);

    log::debug!(
        "{} candidates for {:?} within distance {}",
        found.len(),
        cleaned,
        max_distance
    );
    found
}

/// Levenshtein distance over Unicode scalar values.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}
