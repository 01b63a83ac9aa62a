//! Label generation for hint sets.
//!
//! Numeric labels are consecutive integers starting at a power of ten chosen
//! so every label has the same number of digits. Letter labels are fixed-width
//! codes over the smallest radix that still fits `n` labels into the minimal
//! width, written least-significant letter first.

use crate::errors::{HintError, HintResult};
use crate::model::Variant;

/// First numeric label for a set of `n` hints.
///
/// `start = 10^floor(log10 n)`, bumped one decade when `n > 9 * start` so the
/// last label `start + n - 1` keeps the same width as the first.
pub fn numeric_start(n: usize) -> u64 {
    let n = n as u64;
    let mut start = 1u64;
    while start.saturating_mul(10) <= n {
        start *= 10;
    }
    if n > 10 * start - start {
        start *= 10;
    }
    start.max(1)
}

/// Smallest width `w` such that `base^w >= n`, never less than one.
fn min_width(n: usize, base: usize) -> usize {
    let mut width = 1;
    let mut capacity = base;
    while capacity < n {
        capacity = capacity.saturating_mul(base);
        width += 1;
    }
    width
}

/// Smallest radix `r` such that `r^width >= n`.
fn min_radix(n: usize, width: usize) -> usize {
    let mut radix = 1usize;
    loop {
        let capacity = (0..width).try_fold(1usize, |acc, _| acc.checked_mul(radix));
        match capacity {
            Some(capacity) if capacity < n => radix += 1,
            _ => return radix,
        }
    }
}

pub fn letter_labels(n: usize, alphabet: &[char]) -> HintResult<Vec<String>> {
    if n == 0 {
        return Err(HintError::NoCandidates);
    }
    if alphabet.len() < 2 {
        return Err(HintError::invalid_config(
            "letter labels need an alphabet of at least two letters",
        ));
    }
    let width = min_width(n, alphabet.len());
    let radix = min_radix(n, width);
    let labels = (0..n)
        .map(|index| {
            let mut cur = index;
            let mut text = String::with_capacity(width);
            for _ in 0..width {
                text.push(alphabet[cur % radix]);
                cur /= radix;
            }
            text
        })
        .collect();
    Ok(labels)
}

pub fn numeric_labels(n: usize) -> HintResult<Vec<String>> {
    if n == 0 {
        return Err(HintError::NoCandidates);
    }
    let start = numeric_start(n);
    Ok((0..n as u64).map(|i| (start + i).to_string()).collect())
}

/// Labels for `n` candidates. Pure in `(n, variant, alphabet)`.
pub fn generate(n: usize, variant: Variant, alphabet: &[char]) -> HintResult<Vec<String>> {
    match variant {
        Variant::Numeric => numeric_labels(n),
        Variant::Letter => letter_labels(n, alphabet),
    }
}
