//! Similarity engine
//!
//! Levenshtein edit distance over Unicode scalar values, a normalized
//! case-insensitive similarity score, and ranked fuzzy search used for
//! "did you mean" suggestions.

/// Levenshtein distance between `a` and `b`.
///
/// Insertions, deletions and substitutions each cost 1. Comparison is
/// case-sensitive and counts `char`s, not bytes.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Keep the row over the shorter string
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };
    if short.is_empty() {
        return long.len();
    }

    let mut previous: Vec<usize> = (0..=short.len()).collect();
    let mut current: Vec<usize> = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        current[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let cost = usize::from(lc != sc);
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            let substitution = previous[j] + cost;
            current[j + 1] = insertion.min(deletion).min(substitution);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[short.len()]
}

/// Case-insensitive similarity in `[0, 1]`.
///
/// `1 - distance / max(len(a), len(b), 1)`, so two empty strings score `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longest = a.chars().count().max(b.chars().count()).max(1);
    1.0 - edit_distance(&a, &b) as f64 / longest as f64
}

/// Score every candidate against `query`, drop those below `threshold`,
/// and sort the rest best-first.
///
/// Equal scores keep their original candidate order.
pub fn rank_by_similarity<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    threshold: f64,
) -> Vec<(&'a str, f64)> {
    rank_indices(query, candidates, threshold)
        .into_iter()
        .map(|(i, score)| (candidates[i].as_ref(), score))
        .collect()
}

/// Same ranking as [`rank_by_similarity`], reporting candidate positions
pub(crate) fn rank_indices<S: AsRef<str>>(
    query: &str,
    candidates: &[S],
    threshold: f64,
) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, similarity(query, c.as_ref())))
        .filter(|(_, score)| *score >= threshold)
        .collect();

    // sort_by is stable, so ties keep candidate order
    ranked.sort_by(|x, y| y.1.total_cmp(&x.1));
    ranked
}
