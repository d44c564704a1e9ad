// Licensed under the Apache-2.0 license

//! Brute-force counter search for symmetric counter values.
//!
//! The search walks three parameterizations in order of increasing cost:
//! both dividers bypassed (`ref * 2m`), the post-scale divider bypassed
//! (`ref * m/n`), then all counters active (`ref * m/(2nc)`). An exact
//! floating-point match ends the search immediately; otherwise the closest
//! frequency seen anywhere wins.

use log::debug;

/// Duty-symmetric counter encoding: equal high and low phases.
const fn symmetric_counter(v: u32) -> u32 {
    (v | (v << 8)) & COUNTER_MASK
}

const COUNTER_BYPASS: u32 = 1 << 16;
const COUNTER_MASK: u32 = 0x0003_ffff;

/// Counter values ready to program, plus the output frequency they produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterSolution {
    pub m: u32,
    pub n: u32,
    pub c: u32,
    pub freq: f32,
}

/// Find symmetric counter values producing `desired_freq` from
/// `reference_freq`, or the closest achievable frequency if no combination
/// hits it exactly.
pub fn calculate_counters_brute_force(reference_freq: f32, desired_freq: f32) -> CounterSolution {
    let mut m_best = COUNTER_BYPASS;
    let mut n_best = COUNTER_BYPASS;
    let mut c_best = COUNTER_BYPASS;
    let mut best_fit_freq = f32::MAX;

    debug!("counter search: ref {reference_freq} Hz, desired {desired_freq} Hz");

    // Bypass the n and c counters.
    for m in 1..255u32 {
        let calculated = reference_freq * (2 * m) as f32;
        if calculated == desired_freq {
            return matched(m, COUNTER_BYPASS, COUNTER_BYPASS, calculated);
        }
        if (calculated - desired_freq).abs() < (best_fit_freq - desired_freq).abs() {
            m_best = m;
            best_fit_freq = calculated;
        }
    }

    // Bypass the c counter.
    for n in 1..255u32 {
        for m in 1..255u32 {
            let calculated = reference_freq * (m as f32 / n as f32);
            if calculated == desired_freq {
                return matched(m, n, COUNTER_BYPASS, calculated);
            }
            if (calculated - desired_freq).abs() < (best_fit_freq - desired_freq).abs() {
                m_best = m;
                n_best = n;
                best_fit_freq = calculated;
            }
        }
    }

    // All counters active.
    for c in 1..255u32 {
        for n in 1..255u32 {
            for m in 1..255u32 {
                let calculated = reference_freq * (m as f32 / (2 * n * c) as f32);
                if calculated == desired_freq {
                    return matched(m, n, c, calculated);
                }
                if (calculated - desired_freq).abs() < (best_fit_freq - desired_freq).abs() {
                    m_best = m;
                    n_best = n;
                    c_best = c;
                    best_fit_freq = calculated;
                }
            }
        }
    }

    debug!("counter search: no exact match, best fit {best_fit_freq} Hz");
    matched(m_best, n_best, c_best, best_fit_freq)
}

fn matched(m: u32, n: u32, c: u32, freq: f32) -> CounterSolution {
    CounterSolution {
        m: symmetric_counter(m),
        n: symmetric_counter(n),
        c: symmetric_counter(c),
        freq,
    }
}
