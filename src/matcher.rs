//! Fuzzy answer matching
//!
//! Partial-ratio similarity: the shorter string is slid across the longer one
//! and the best-aligned window wins, so "bohemian rhap" still matches
//! "bohemian rhapsody". Windows are scored by indel ratio (LCS based), so a
//! pair of swapped letters costs one edit rather than two.

use std::cmp::Ordering;

/// Lowercase, turn punctuation into spaces, collapse whitespace
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity score in `0..=100`, floored. Empty input on either side scores 0.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let best = match a.len().cmp(&b.len()) {
        Ordering::Less => best_alignment(&a, &b),
        Ordering::Greater => best_alignment(&b, &a),
        Ordering::Equal => best_alignment(&a, &b).max(best_alignment(&b, &a)),
    };

    best.min(100) as u8
}

/// Best indel ratio of `needle` against every window of `haystack`.
/// Windows running off either edge are cut short, as in a partial ratio.
fn best_alignment(needle: &[char], haystack: &[char]) -> usize {
    let n = needle.len();
    let h = haystack.len();

    let prefixes = (1..n.min(h)).map(|end| &haystack[..end]);
    let full = haystack.windows(n);
    let suffixes = (h.saturating_sub(n) + 1..h).map(|start| &haystack[start..]);

    let mut best = 0;
    for window in prefixes.chain(full).chain(suffixes) {
        best = best.max(indel_ratio(needle, window));
        if best == 100 {
            break;
        }
    }
    best
}

/// `2 * lcs / (|a| + |b|)` as a floored percentage
fn indel_ratio(a: &[char], b: &[char]) -> usize {
    let total = a.len() + b.len();
    if total == 0 {
        return 0;
    }
    200 * lcs_len(a, b) / total
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Don't  Stop Me\tNow! "), "don t stop me now");
        assert_eq!(normalize("AC/DC"), "ac dc");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_partial_guess_matches() {
        assert!(similarity("bohemian rhap", "bohemian rhapsody") >= 80);
        assert!(similarity("yellow submarin", "yellow submarine") >= 80);
    }

    #[test]
    fn test_unrelated_titles_do_not_match() {
        assert!(similarity("stairway to heaven", "hotel california") < 80);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert_eq!(similarity("YELLOW SUBMARINE!!", "yellow submarine"), 100);
    }

    #[test]
    fn test_guess_containing_answer() {
        assert_eq!(
            similarity("i think it's yellow submarine by the beatles", "yellow submarine"),
            100
        );
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("bohemian rhap", "bohemian rhapsody"),
            ("hey jude", "hey joe"),
            ("stairway to heaven", "hotel california"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn test_transposed_letters_match() {
        assert!(similarity("hey jued", "hey jude") >= 80);
        assert!(similarity("let it eb", "let it be") >= 80);
        assert!(similarity("yelow submraine", "yellow submarine") >= 80);
    }

    #[test]
    fn test_score_is_floored() {
        // Best window is "a" against "ab": 2 * 1 / 3
        assert_eq!(similarity("ab", "ac"), 66);
    }

    #[test]
    fn test_lcs_len() {
        let a: Vec<char> = "hey jued".chars().collect();
        let b: Vec<char> = "hey jude".chars().collect();
        assert_eq!(lcs_len(&a, &b), 7);
        assert_eq!(lcs_len(&a, &[]), 0);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(similarity("", "yellow submarine"), 0);
        assert_eq!(similarity("yellow submarine", "   "), 0);
        assert_eq!(similarity("?!", "yellow submarine"), 0);
    }
}
