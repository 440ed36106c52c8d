//! Fuzzy string scoring for OCR correction.
//!
//! Scores are 0-100. Both inputs are normalized first: lowercased, every
//! non-alphanumeric character replaced by a space, then trimmed. The base
//! score is the Levenshtein distance normalized by the combined length, so a
//! single misread letter in a nine-letter word still scores above 94.

use std::collections::BTreeSet;

use levenshtein::levenshtein;

/// Lowercases, replaces non-alphanumerics with spaces and trims.
pub fn normalize(s: &str) -> String {
    let mapped: String = s
        .chars()
        .flat_map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().collect::<Vec<_>>()
            } else {
                vec![' ']
            }
        })
        .collect();
    mapped.trim().to_string()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Similarity of two already-normalized strings.
fn ratio_normalized(a: &str, b: &str) -> f64 {
    let lensum = char_len(a) + char_len(b);
    if lensum == 0 {
        return 100.0;
    }
    let distance = levenshtein(a, b).min(lensum);
    100.0 * (lensum - distance) as f64 / lensum as f64
}

/// Best ratio of the shorter string against every equally long window of
/// the longer one.
fn partial_ratio_normalized(a: &str, b: &str) -> f64 {
    let (short, long) = if char_len(a) <= char_len(b) { (a, b) } else { (b, a) };
    let short_len = char_len(short);
    if short_len == 0 {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let long_chars: Vec<char> = long.chars().collect();
    let mut best = 0.0f64;
    for window in long_chars.windows(short_len) {
        let candidate: String = window.iter().collect();
        let score = ratio_normalized(short, &candidate);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Sorted unique words split into (shared, only in a, only in b).
struct TokenSets {
    common: String,
    diff_ab: String,
    diff_ba: String,
}

impl TokenSets {
    fn new(a: &str, b: &str) -> Self {
        let a: BTreeSet<&str> = a.split_whitespace().collect();
        let b: BTreeSet<&str> = b.split_whitespace().collect();
        let join = |words: Vec<&str>| words.join(" ");
        Self {
            common: join(a.intersection(&b).copied().collect()),
            diff_ab: join(a.difference(&b).copied().collect()),
            diff_ba: join(b.difference(&a).copied().collect()),
        }
    }
}

fn with_suffix(common: &str, diff: &str) -> String {
    match (common.is_empty(), diff.is_empty()) {
        (true, _) => diff.to_string(),
        (_, true) => common.to_string(),
        _ => format!("{common} {diff}"),
    }
}

fn token_set_ratio_normalized(a: &str, b: &str) -> f64 {
    let sets = TokenSets::new(a, b);
    // One word set contained in the other
    if !sets.common.is_empty() && (sets.diff_ab.is_empty() || sets.diff_ba.is_empty()) {
        return 100.0;
    }

    let ab = with_suffix(&sets.common, &sets.diff_ab);
    let ba = with_suffix(&sets.common, &sets.diff_ba);
    let mut best = ratio_normalized(&ab, &ba);
    if !sets.common.is_empty() {
        best = best
            .max(ratio_normalized(&sets.common, &ab))
            .max(ratio_normalized(&sets.common, &ba));
    }
    best
}

fn partial_token_set_ratio_normalized(a: &str, b: &str) -> f64 {
    let sets = TokenSets::new(a, b);
    if !sets.common.is_empty() {
        return 100.0;
    }
    partial_ratio_normalized(&sets.diff_ab, &sets.diff_ba)
}

/// Normalized similarity of the two strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    ratio_normalized(&normalize(a), &normalize(b))
}

/// Similarity of the shorter string to the best matching part of the longer.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    partial_ratio_normalized(&normalize(a), &normalize(b))
}

/// Similarity after sorting the words of both strings.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio_normalized(&sorted_tokens(&normalize(a)), &sorted_tokens(&normalize(b)))
}

/// Similarity of the shared words plus each side's leftovers. A reading
/// whose words are all contained in the other string scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    token_set_ratio_normalized(&normalize(a), &normalize(b))
}

/// Combined score used to pick database entries.
///
/// Similar lengths compare whole strings, with word order and missing words
/// tolerated at a small penalty. Very different lengths fall back to scaled
/// partial matches.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    weighted_ratio_normalized(&a, &b)
}

fn weighted_ratio_normalized(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (len_a, len_b) = (char_len(a) as f64, char_len(b) as f64);
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);
    let base = ratio_normalized(a, b);

    if len_ratio < 1.5 {
        let token_sort = ratio_normalized(&sorted_tokens(a), &sorted_tokens(b));
        let token_set = token_set_ratio_normalized(a, b);
        return base.max(token_sort.max(token_set) * 0.95);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let partial = partial_ratio_normalized(a, b) * partial_scale;
    let partial_tokens = partial_ratio_normalized(&sorted_tokens(a), &sorted_tokens(b))
        .max(partial_token_set_ratio_normalized(a, b));
    base.max(partial).max(partial_tokens * 0.95 * partial_scale)
}

/// Best match found by [`extract_one`].
#[derive(Clone, Debug, PartialEq)]
pub struct Match<'a> {
    pub choice: &'a str,
    pub score: f64,
    pub index: usize,
}

/// Scores `query` against every choice and returns the best one.
///
/// The first choice wins ties. Returns `None` only for an empty list.
pub fn extract_one<'a, S: AsRef<str>>(query: &str, choices: &'a [S]) -> Option<Match<'a>> {
    let query = normalize(query);
    let mut best: Option<Match<'a>> = None;

    for (index, choice) in choices.iter().enumerate() {
        let choice = choice.as_ref();
        let score = weighted_ratio_normalized(&query, &normalize(choice));
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(Match {
                choice,
                score,
                index,
            });
        }
    }

    best
}

/// Replaces an OCR reading with its closest database entry when the match
/// is at least `threshold`; otherwise returns the reading unchanged.
pub fn correct(raw: &str, choices: &[String], threshold: f64) -> String {
    match extract_one(raw, choices) {
        Some(m) => {
            tracing::info!("Corrected: {} -> {} ({:.1})", raw, m.choice, m.score);
            if m.score >= threshold {
                m.choice.to_string()
            } else {
                raw.to_string()
            }
        }
        None => raw.to_string(),
    }
}

/// True when the status reading contains the completed label.
pub fn is_completed(status: &str, completed_label: &str, threshold: f64) -> bool {
    partial_ratio(completed_label, status) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Déjà Vu!? "), "déjà vu");
        assert_eq!(normalize("\"Quote\"-Unquote"), "quote  unquote");
        assert_eq!(normalize("..."), "");
    }

    #[test]
    fn test_identity_scores_100() {
        assert_eq!(ratio("Adventurer", "Adventurer"), 100.0);
        assert_eq!(weighted_ratio("Wonders of the World", "Wonders of the World"), 100.0);
    }

    #[test]
    fn test_ratio_ignores_case_and_punctuation() {
        assert_eq!(ratio("ADVENTURER.", "adventurer"), 100.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(weighted_ratio("", "Adventurer"), 0.0);
        assert_eq!(partial_ratio("Completed", ""), 0.0);
    }

    #[test]
    fn test_single_misread_letter() {
        let score = ratio("Completed", "Compieted");
        assert!(score > 94.0 && score < 95.0, "{score}");
    }

    #[test]
    fn test_completed_status() {
        assert!(is_completed("Compieted", "Completed", 90.0));
        assert!(is_completed("Completed\n2023/05/14", "Completed", 90.0));
        assert!(!is_completed("In Progress", "Completed", 90.0));
        assert!(!is_completed("3/10", "Completed", 90.0));
        assert!(!is_completed("", "Completed", 90.0));
    }

    #[test]
    fn test_partial_ratio_finds_substring() {
        assert_eq!(partial_ratio("Completed", "Completed 2023 01 01"), 100.0);
    }

    #[test]
    fn test_token_sort() {
        assert_eq!(token_sort_ratio("of Wonders World", "World of Wonders"), 100.0);
    }

    #[test]
    fn test_token_set() {
        assert_eq!(token_set_ratio("Wonders of the", "Wonders of the World"), 100.0);
        assert!(token_set_ratio("Meet the Ancients", "Adventurer") < 90.0);
        let score = token_set_ratio("Wonders of the Wor1d", "Wonders of the World");
        assert!(score > 90.0 && score < 100.0, "{score}");
    }

    #[test]
    fn test_truncated_reading_is_corrected() {
        let choices = names(&["Adventurer", "Meet the Ancients", "Wonders of the World"]);
        let m = extract_one("Wonders of the", &choices).unwrap();
        assert_eq!(m.choice, "Wonders of the World");
        assert!((m.score - 95.0).abs() < 1e-9, "{}", m.score);
        assert_eq!(correct("Wonders of the", &choices, 90.0), "Wonders of the World");
    }

    #[test]
    fn test_extract_one_best_and_ties() {
        let choices = names(&["Adventurer", "Adventurer", "Wonders of the World"]);
        let m = extract_one("Adventurar", &choices).unwrap();
        assert_eq!(m.choice, "Adventurer");
        assert_eq!(m.index, 0);

        let empty: Vec<String> = Vec::new();
        assert!(extract_one("anything", &empty).is_none());
    }

    #[test]
    fn test_correct_accepts_close_match() {
        let choices = names(&["Adventurer", "Meet the Ancients", "Wonders of the World"]);
        assert_eq!(correct("Wonders of the Wor1d", &choices, 90.0), "Wonders of the World");
    }

    #[test]
    fn test_correct_passes_through_below_threshold() {
        let choices = names(&["Adventurer", "Meet the Ancients"]);
        assert_eq!(correct("Something Else Entirely", &choices, 90.0), "Something Else Entirely");
    }
}
