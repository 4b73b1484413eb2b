//! Search-as-you-type suggestions over the champion registry.

use std::cmp::Ordering;

use crate::registry::Champion;

const MAX_SUGGESTIONS: usize = 5;

/// Minimum similarity for a champion to appear in the suggestions.
const MIN_SCORE: f64 = 0.4;

/// Up to five champions best matching `query` against name and numeric id.
/// An empty or whitespace query yields no suggestions.
pub fn suggest<'a>(champions: &'a [Champion], query: &str) -> Vec<&'a Champion> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &Champion)> = champions
        .iter()
        .filter_map(|c| {
            let score = match_score(c, &query);
            (score >= MIN_SCORE).then_some((score, c))
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, c)| c)
        .collect()
}

fn match_score(champion: &Champion, query: &str) -> f64 {
    let name = champion.name.to_lowercase();
    let id = champion.id.to_string();
    name_score(&name, query).max(name_score(&id, query))
}

fn name_score(candidate: &str, query: &str) -> f64 {
    if candidate == query {
        return 1.0;
    }
    // A word-prefix hit ("kasp" → "kasparov") outranks edit distance
    if candidate
        .split_whitespace()
        .any(|word| word.starts_with(query))
    {
        return 0.9;
    }
    if candidate.contains(query) {
        return 0.8;
    }
    candidate
        .split_whitespace()
        .map(|word| similarity(word, query))
        .fold(0.0, f64::max)
}

fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b.len()]
}
