//! Payee similarity: a Ratcliff/Obershelp ratio over normalized payee names.

/// Lowercases, turns everything that isn't alphanumeric or whitespace into a
/// space and collapses whitespace runs.
pub fn normalize_payee(payee: &str) -> String {
    payee
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity of two payees in `[0, 1]`. Two empty payees are identical,
/// an empty payee is nothing like a non-empty one.
pub fn payee_similarity(a: &str, b: &str) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => ratio(&normalize_payee(a), &normalize_payee(b)),
    }
}

/// `2 * M / T`, where `M` is the number of characters in the matching blocks
/// found by recursively taking the longest common substring, and `T` the total
/// number of characters in both strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((a_low, a_high, b_low, b_high)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, a_low, a_high, b_low, b_high);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_low < i && b_low < j {
            pending.push((a_low, i, b_low, j));
        }
        if i + size < a_high && j + size < b_high {
            pending.push((i + size, a_high, j + size, b_high));
        }
    }
    matched
}

/// The longest common substring of `a[a_low..a_high]` and `b[b_low..b_high]`.
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    a_low: usize,
    a_high: usize,
    b_low: usize,
    b_high: usize,
) -> (usize, usize, usize) {
    let width = b_high - b_low;
    let mut best = (a_low, b_low, 0);
    // lengths[k + 1] is the length of the common run ending at a[i] and b[b_low + k].
    let mut previous = vec![0usize; width + 1];
    let mut current = vec![0usize; width + 1];
    for i in a_low..a_high {
        for k in 0..width {
            current[k + 1] = if a[i] == b[b_low + k] {
                previous[k] + 1
            } else {
                0
            };
            let size = current[k + 1];
            if size > best.2 {
                best = (i + 1 - size, b_low + k + 1 - size, size);
            }
        }
        std::mem::swap(&mut previous, &mut current);
    }
    best
}
