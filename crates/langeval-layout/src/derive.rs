//! Display values derived from an observation without mutating it.

use langeval_core::Observation;

/// Elapsed milliseconds between start and end, `0` when either is missing.
///
/// An end before the start is clamped to `0`.
pub fn duration_ms(obs: &Observation) -> i64 {
    match (obs.start_time, obs.end_time) {
        (Some(start), Some(end)) => {
            let ms = (end - start).num_milliseconds();
            if ms < 0 {
                tracing::debug!(id = %obs.id, ms, "Clamping negative duration to zero");
                0
            } else {
                ms
            }
        }
        _ => 0,
    }
}

pub fn duration_seconds(obs: &Observation) -> f64 {
    duration_ms(obs) as f64 / 1000.0
}

/// Cost in USD. Missing, negative and non-finite values read as `0`.
pub fn cost(obs: &Observation) -> f64 {
    match obs.calculated_total_cost {
        Some(c) if c.is_finite() && c > 0.0 => c,
        _ => 0.0,
    }
}
