// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Deterministic synthetic sensor runs shared by the benchmarks.

use onsett_core::{OnsetError, SensorSeries};

fn lcg_next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

/// Uniform noise in `[-amplitude, amplitude)`.
fn noise(state: &mut u64, amplitude: f64) -> f64 {
    let unit = (lcg_next(state) >> 11) as f64 / (1u64 << 53) as f64;
    (2.0 * unit - 1.0) * amplitude
}

/// `n` samples at one per second with a pressure drop of 3 bar every
/// `period` samples and a 2 degC temperature spike three samples later.
pub fn staircase_run(n: usize, period: usize) -> Result<SensorSeries, OnsetError> {
    let period = period.max(1);
    let mut state = 0xfeed_f00d_dead_beef_u64;
    let mut pressure = Vec::with_capacity(n);
    let mut temperature = Vec::with_capacity(n);
    for i in 0..n {
        let step = (i / period) as f64;
        pressure.push(40.0 - 3.0 * step + noise(&mut state, 0.05));
        let spike = if i % period >= 3 && i >= period { 2.0 } else { 0.0 };
        temperature.push(4.0 - 0.1 * step + spike + noise(&mut state, 0.01));
    }
    let elapsed = (0..n).map(|i| i as f64).collect();
    SensorSeries::new(pressure, temperature, elapsed)
}

/// Random `[start, end)` segments with `end > start`.
pub fn segment_queries(n: usize, count: usize) -> Vec<(usize, usize)> {
    let mut state = 0x0123_4567_89ab_cdef_u64;
    (0..count)
        .map(|_| {
            let a = (lcg_next(&mut state) as usize) % n;
            let b = (lcg_next(&mut state) as usize) % n;
            (a.min(b), (a.max(b) + 1).min(n))
        })
        .collect()
}
