// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Prefix-sum helpers backing O(1) segment statistics.
//!
//! Every function returns `values.len() + 1` entries with a leading zero, so
//! the sum over `[start, end)` is `out[end] - out[start]`.

/// Plain running sums.
pub fn prefix_sums(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() + 1);
    let mut acc = 0.0;
    out.push(acc);
    for &value in values {
        acc += value;
        out.push(acc);
    }
    out
}

/// Running sums with Kahan compensation.
pub fn prefix_sums_kahan(values: &[f64]) -> Vec<f64> {
    kahan_scan(values.iter().copied())
}

/// Plain running sums of squares.
pub fn prefix_sum_squares(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() + 1);
    let mut acc = 0.0;
    out.push(acc);
    for &value in values {
        acc += value * value;
        out.push(acc);
    }
    out
}

/// Running sums of squares with Kahan compensation.
pub fn prefix_sum_squares_kahan(values: &[f64]) -> Vec<f64> {
    kahan_scan(values.iter().map(|v| v * v))
}

fn kahan_scan(values: impl ExactSizeIterator<Item = f64>) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() + 1);
    let mut sum = 0.0;
    let mut compensation = 0.0;
    out.push(sum);
    for value in values {
        let y = value - compensation;
        let t = sum + y;
        compensation = (t - sum) - y;
        sum = t;
        out.push(sum);
    }
    out
}
