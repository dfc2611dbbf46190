//! Truncated power-series integrator for powered flight.
//!
//! Over one step of `s` seconds at burn rate `k` the capsule mass falls from `m` to
//! `m - s·k`. With `Q = s·k/m` the exact rocket-equation integrals expand as
//! `-ln(1 - Q) = Q + Q²/2 + Q³/3 + …`; both series are cut after the fifth power.

use crate::state::FlightState;

/// Altitude and velocity proposed at the end of a step, not yet committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub altitude_miles: f64,
    pub velocity_miles_s: f64,
}

/// Advance `state` by `step_s` seconds at its current fuel rate.
pub fn integrate(state: &FlightState, step_s: f64) -> Candidate {
    let a = state.altitude_miles;
    let v = state.velocity_miles_s;
    let g = state.gravity;
    let s = step_s;

    if state.fuel_rate_lbs_s == 0.0 {
        return free_fall(a, v, g, s);
    }

    let z = state.exhaust_velocity;
    let q = s * state.fuel_rate_lbs_s / state.total_weight_lbs;
    let q2 = q * q;
    let q3 = q2 * q;
    let q4 = q3 * q;
    let q5 = q4 * q;

    Candidate {
        velocity_miles_s: v + g * s + z * (-q - q2 / 2.0 - q3 / 3.0 - q4 / 4.0 - q5 / 5.0),
        altitude_miles: a - g * s * s / 2.0
            - v * s
            + z * s * (q / 2.0 + q2 / 6.0 + q3 / 12.0 + q4 / 20.0 + q5 / 30.0),
    }
}

/// Unpowered motion under gravity alone.
fn free_fall(a: f64, v: f64, g: f64, s: f64) -> Candidate {
    Candidate {
        velocity_miles_s: v + g * s,
        altitude_miles: a - g * s * s / 2.0 - v * s,
    }
}
