use std::collections::HashMap;

/// Minimum score for a single string to count as a near-miss of a candidate.
pub const DEFAULT_THRESHOLD: f64 = 0.9;

/// Minimum score when scanning a block of text line by line.
pub const LINE_SCAN_THRESHOLD: f64 = 0.7;

/// Best candidate for a piece of text together with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    pub candidate: &'a str,
    pub score: f64,
}

/// Best candidate found while scanning text, with the line that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch<'a> {
    pub line: String,
    pub candidate: &'a str,
    pub score: f64,
}

/// Sørensen–Dice coefficient over character bigrams, ignoring case and whitespace.
pub fn similarity(left: &str, right: &str) -> f64 {
    let left: Vec<char> = normalize(left);
    let right: Vec<char> = normalize(right);

    if left == right {
        return 1.0;
    }
    if left.len() < 2 || right.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in left.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut shared = 0usize;
    for pair in right.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1]))
            && *count > 0
        {
            *count -= 1;
            shared += 1;
        }
    }

    (2 * shared) as f64 / (left.len() + right.len() - 2) as f64
}

/// Best-scoring candidate at or above `threshold`.
///
/// Ties keep the earliest candidate.
pub fn find_best_match<'a, S: AsRef<str>>(
    target: &str,
    candidates: &'a [S],
    threshold: f64,
) -> Option<FuzzyMatch<'a>> {
    let mut best: Option<FuzzyMatch<'a>> = None;
    for candidate in candidates {
        let candidate = candidate.as_ref();
        let score = similarity(target, candidate);
        if score < threshold {
            continue;
        }
        if best.as_ref().is_none_or(|current| score > current.score) {
            best = Some(FuzzyMatch { candidate, score });
        }
    }
    best
}

/// Scan `text` line by line for the best candidate at or above `threshold`.
pub fn find_best_match_in_text<'a, S: AsRef<str>>(
    text: &str,
    candidates: &'a [S],
    threshold: f64,
) -> Option<LineMatch<'a>> {
    let mut best: Option<LineMatch<'a>> = None;
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let Some(found) = find_best_match(line, candidates, threshold) else {
            continue;
        };
        if best.as_ref().is_none_or(|current| found.score > current.score) {
            best = Some(LineMatch {
                line: line.to_string(),
                candidate: found.candidate,
                score: found.score,
            });
        }
    }
    best
}

fn normalize(value: &str) -> Vec<char> {
    value
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
