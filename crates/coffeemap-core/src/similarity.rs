// crates/coffeemap-core/src/similarity.rs

//! Longest-matching-block similarity (Ratcliff/Obershelp).
//!
//! `ratio = 2 * M / T`, where `M` counts the chars inside matching blocks and
//! `T` is the combined length of both strings. Blocks are found by taking the
//! longest common substring and recursing on the pieces to its left and
//! right. Among equally long substrings the one starting earliest in `a`,
//! then earliest in `b`, is taken, which keeps scores reproducible.
//!
//! Inputs are compared char by char. Popular-element pruning is not applied;
//! country keys are far below the length where it would kick in.

use std::collections::HashMap;

/// Chars of `b` mapped to the ascending positions where they occur.
struct Positions {
    by_char: HashMap<char, Vec<usize>>,
}

impl Positions {
    fn new(b: &[char]) -> Self {
        let mut by_char: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            by_char.entry(*c).or_default().push(j);
        }
        Self { by_char }
    }

    fn of(&self, c: char) -> &[usize] {
        self.by_char.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
fn longest_match(
    a: &[char],
    positions: &Positions,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // Length of the match ending at a[i-1], b[j], keyed by j.
    let mut run_len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run_len = HashMap::new();
        for &j in positions.of(*c) {
            if j < blo {
                continue;
            }
            if j >= bhi {
                break;
            }
            let k = j
                .checked_sub(1)
                .and_then(|prev| run_len.get(&prev))
                .copied()
                .unwrap_or(0)
                + 1;
            next_run_len.insert(j, k);
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        run_len = next_run_len;
    }

    (best_i, best_j, best_size)
}

/// Total number of chars covered by matching blocks between `a` and `b`.
pub fn matched_chars(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let positions = Positions::new(&b);

    let mut total = 0;
    let mut pending = vec![((0, a.len()), (0, b.len()))];
    while let Some(((alo, ahi), (blo, bhi))) = pending.pop() {
        let (i, j, size) = longest_match(&a, &positions, (alo, ahi), (blo, bhi));
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            pending.push(((alo, i), (blo, j)));
        }
        if i + size < ahi && j + size < bhi {
            pending.push(((i + size, ahi), (j + size, bhi)));
        }
    }
    total
}

#[inline]
fn score(matches: usize, total_len: usize) -> f64 {
    if total_len == 0 {
        1.0
    } else {
        2.0 * matches as f64 / total_len as f64
    }
}

/// Similarity in `[0, 1]`; two empty strings score `1.0`.
///
/// ```rust
/// use coffeemap_core::similarity::ratio;
///
/// assert_eq!(ratio("abce", "abcd"), 0.75);
/// assert_eq!(ratio("bolivia", "bolivia"), 1.0);
/// ```
pub fn ratio(a: &str, b: &str) -> f64 {
    let total_len = a.chars().count() + b.chars().count();
    score(matched_chars(a, b), total_len)
}

/// Upper bound on [`ratio`] from shared char counts, ignoring order.
pub fn quick_ratio(a: &str, b: &str) -> f64 {
    let mut available: HashMap<char, usize> = HashMap::new();
    let mut b_len = 0;
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
        b_len += 1;
    }

    let mut a_len = 0;
    let mut matches = 0;
    for c in a.chars() {
        a_len += 1;
        if let Some(left) = available.get_mut(&c) {
            if *left > 0 {
                *left -= 1;
                matches += 1;
            }
        }
    }
    score(matches, a_len + b_len)
}

/// Upper bound on [`ratio`] from lengths alone.
pub fn real_quick_ratio(a: &str, b: &str) -> f64 {
    let la = a.chars().count();
    let lb = b.chars().count();
    score(la.min(lb), la + lb)
}
