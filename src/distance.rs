//! Normalized segment-level edit distance.
//!
//! The metric is Levenshtein distance where each "character" is a whole path
//! segment, divided by the length of the longer operand. Result is in `[0, 1]`.
//!
//! ## Trimming
//!
//! Hierarchical keys usually share long leading segments (`org/team/...`), so the
//! common prefix and suffix are cut before running the DP. The prefix walk stops
//! one element early when the shorter operand matches entirely; the suffix walk
//! then absorbs that element. The two walks never overlap, so the trimmed middle
//! regions give the same edit distance as the untrimmed operands.

use crate::error::{KnnError, Result};
use crate::tokenize::tokenize;

/// Normalized edit distance between two segment sequences.
///
/// Returns `edit_distance(s, t) / max(len(s), len(t))`.
///
/// # Errors
///
/// [`KnnError::InvalidMetricInput`] if both `s` and `t` are empty.
#[inline]
pub fn distance<T: PartialEq>(s: &[T], t: &[T]) -> Result<f64> {
    let longest = s.len().max(t.len());
    if longest == 0 {
        return Err(KnnError::InvalidMetricInput);
    }
    Ok(edit_distance(s, t) as f64 / longest as f64)
}

/// Normalized edit distance between two path strings, tokenized on `/`.
///
/// Never fails: every path has at least one segment.
pub fn path_distance(a: &str, b: &str) -> Result<f64> {
    distance(&tokenize(a), &tokenize(b))
}

/// Raw (un-normalized) segment edit distance: insert, delete and substitute all
/// cost 1.
#[must_use]
pub fn edit_distance<T: PartialEq>(s: &[T], t: &[T]) -> usize {
    let (k, l) = common_affixes(s, t);
    let (shrt, lng) = shorter_longer(&s[k..s.len() - l], &t[k..t.len() - l]);
    wagner_fischer(shrt, lng)
}

/// Count of matching leading (`k`) and trailing (`l`) elements.
///
/// `k + l <= min(len(s), len(t))` always holds.
fn common_affixes<T: PartialEq>(s: &[T], t: &[T]) -> (usize, usize) {
    let (m, n) = (s.len(), t.len());
    let shortest = m.min(n);

    let mut k = 0;
    if shortest > 0 {
        while s[k] == t[k] {
            if k == shortest - 1 {
                break;
            }
            k += 1;
        }
    }

    let mut l = 0;
    while shortest - l - k > 0 && s[m - 1 - l] == t[n - 1 - l] {
        l += 1;
    }

    (k, l)
}

/// Order two slices as `(shorter, longer)`; `a` wins ties.
#[inline]
fn shorter_longer<'a, T>(a: &'a [T], b: &'a [T]) -> (&'a [T], &'a [T]) {
    if a.len() > b.len() {
        (b, a)
    } else {
        (a, b)
    }
}

/// Single-row Wagner–Fischer. `shrt` must not be longer than `lng`, which keeps
/// the rolling buffer at `len(shrt) + 1`.
fn wagner_fischer<T: PartialEq>(shrt: &[T], lng: &[T]) -> usize {
    debug_assert!(shrt.len() <= lng.len());
    let (p, q) = (shrt.len(), lng.len());
    let degenerate = p == 0 || q == 0;

    let mut row: Vec<usize> = (0..=p).collect();
    for j in 1..=q {
        let mut diag = row[0];
        row[0] = j;
        for i in 1..=p {
            let cost = usize::from(degenerate || shrt[i - 1] != lng[j - 1]);
            let above = row[i];
            row[i] = (above + 1).min(row[i - 1] + 1).min(diag + cost);
            diag = above;
        }
    }
    row[p]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &[&str], t: &[&str]) -> f64 {
        distance(s, t).unwrap()
    }

    #[test]
    fn identical_is_zero() {
        assert_eq!(d(&["a", "b", "c"], &["a", "b", "c"]), 0.0);
        assert_eq!(d(&["a"], &["a"]), 0.0);
        assert_eq!(d(&[""], &[""]), 0.0);
    }

    #[test]
    fn one_substitution_over_two() {
        assert_eq!(d(&["a", "b"], &["a", "c"]), 0.5);
    }

    #[test]
    fn empty_against_one() {
        assert_eq!(d(&[], &["x"]), 1.0);
        assert_eq!(d(&["x"], &[]), 1.0);
    }

    #[test]
    fn both_empty_is_an_error() {
        let empty: [&str; 0] = [];
        assert_eq!(distance(&empty, &empty), Err(KnnError::InvalidMetricInput));
    }

    #[test]
    fn prefix_walk_stops_before_last_shared_element() {
        // Shorter operand fully matches: prefix stops at shortest - 1 and the
        // suffix walk picks up the final element.
        assert_eq!(common_affixes(&["a", "b", "c"], &["a", "b", "c"]), (2, 1));
        assert_eq!(common_affixes(&["a"], &["a", "b"]), (0, 0));
        assert_eq!(common_affixes(&["a", "b"], &["a", "b", "a", "b"]), (1, 1));
        assert_eq!(common_affixes::<&str>(&[], &["x"]), (0, 0));
    }

    #[test]
    fn affixes_never_overlap() {
        let s = ["a", "a", "a"];
        let t = ["a", "a", "a", "a", "a"];
        let (k, l) = common_affixes(&s, &t);
        assert!(k + l <= s.len());
        assert_eq!(edit_distance(&s, &t), 2);
    }

    #[test]
    fn trimming_matches_plain_dp() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (vec!["a", "b", "c", "d"], vec!["a", "x", "c", "d"]),
            (vec!["a", "b"], vec!["a", "b", "a", "b"]),
            (vec!["r", "s", "t"], vec!["t", "s", "r"]),
            (vec!["a", "", "b"], vec!["a", "b"]),
            (vec!["q"], vec!["w", "e", "r"]),
            (vec!["k", "k"], vec!["k"]),
        ];
        for (s, t) in &cases {
            assert_eq!(edit_distance(s, t), wagner_fischer_full(s, t), "{s:?} vs {t:?}");
        }
    }

    #[test]
    fn insertion_in_middle() {
        assert_eq!(edit_distance(&["a", "c"], &["a", "b", "c"]), 1);
        assert!((d(&["a", "c"], &["a", "b", "c"]) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn symmetric_regardless_of_operand_order() {
        let s = ["usr", "lib", "rust"];
        let t = ["usr", "share", "doc", "rust"];
        assert_eq!(d(&s, &t), d(&t, &s));
    }

    #[test]
    fn path_distance_tokenizes() {
        assert_eq!(path_distance("a/b", "a/c").unwrap(), 0.5);
        assert_eq!(path_distance("", "").unwrap(), 0.0);
        assert_eq!(path_distance("a//b", "a/b").unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn works_over_owned_strings() {
        let s = vec!["x".to_string(), "y".to_string()];
        let t = vec!["x".to_string()];
        assert_eq!(distance(&s, &t).unwrap(), 0.5);
    }

    /// Textbook two-dimensional DP, no trimming.
    fn wagner_fischer_full(s: &[&str], t: &[&str]) -> usize {
        let mut dp = vec![vec![0usize; t.len() + 1]; s.len() + 1];
        for (i, row) in dp.iter_mut().enumerate() {
            row[0] = i;
        }
        for j in 0..=t.len() {
            dp[0][j] = j;
        }
        for i in 1..=s.len() {
            for j in 1..=t.len() {
                let cost = usize::from(s[i - 1] != t[j - 1]);
                dp[i][j] = (dp[i - 1][j] + 1)
                    .min(dp[i][j - 1] + 1)
                    .min(dp[i - 1][j - 1] + cost);
            }
        }
        dp[s.len()][t.len()]
    }
}
