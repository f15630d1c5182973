//! Edit distance calculation for spelling correction.

use std::cmp::min;

/// Calculate the Levenshtein distance between two strings.
///
/// This is the minimum number of single-character insertions, deletions or
/// substitutions required to change one word into the other.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut curr_row = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            curr_row[j + 1] = min(
                min(
                    prev_row[j + 1] + 1, // deletion
                    curr_row[j] + 1,     // insertion
                ),
                prev_row[j] + cost, // substitution
            );
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[s2_chars.len()]
}

/// Optimal string alignment distance with a threshold for early termination.
///
/// Like Levenshtein distance but an adjacent transposition ("teh" → "the")
/// costs one edit. Returns `None` as soon as the distance is known to exceed
/// `threshold`.
#[allow(clippy::needless_range_loop)]
pub fn transposition_distance_threshold(s1: &str, s2: &str, threshold: usize) -> Option<usize> {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (len1, len2) = (a.len(), b.len());

    // Early termination if length difference exceeds threshold
    if len1.abs_diff(len2) > threshold {
        return None;
    }
    if len1 == 0 || len2 == 0 {
        let distance = len1.max(len2);
        return (distance <= threshold).then_some(distance);
    }

    let mut matrix = vec![vec![0usize; len2 + 1]; len1 + 1];
    for i in 0..=len1 {
        matrix[i][0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        let mut min_in_row = matrix[i][0];
        for j in 1..=len2 {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut value = min(
                min(matrix[i - 1][j] + 1, matrix[i][j - 1] + 1),
                matrix[i - 1][j - 1] + cost,
            );
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                value = min(value, matrix[i - 2][j - 2] + 1);
            }
            matrix[i][j] = value;
            min_in_row = min(min_in_row, value);
        }

        // A transposition can reach back two rows, so only bail out once two
        // consecutive rows are over the threshold.
        if min_in_row > threshold && (i == 1 || matrix[i - 1].iter().min().copied() > Some(threshold))
        {
            return None;
        }
    }

    let distance = matrix[len1][len2];
    (distance <= threshold).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("regx", "regex"), 1);
        assert_eq!(levenshtein_distance("teh", "the"), 2);
    }

    #[test]
    fn test_transposition_counts_once() {
        assert_eq!(transposition_distance_threshold("teh", "the", 2), Some(1));
        assert_eq!(transposition_distance_threshold("qeury", "query", 1), Some(1));
    }

    #[test]
    fn test_threshold_cutoff() {
        assert_eq!(transposition_distance_threshold("regx", "regex", 2), Some(1));
        assert_eq!(transposition_distance_threshold("kitten", "sitting", 2), None);
        assert_eq!(transposition_distance_threshold("a", "abcdef", 2), None);
        assert_eq!(transposition_distance_threshold("", "ab", 2), Some(2));
    }

    #[test]
    fn test_unicode_characters() {
        assert_eq!(levenshtein_distance("café", "cafe"), 1);
        assert_eq!(transposition_distance_threshold("résumé", "resume", 2), Some(2));
    }
}
