//! Per-turn status snapshots.

use lander_core::units::{miles_s_to_mph, split_altitude};
use serde::Serialize;

use crate::state::FlightState;

/// Radar reading taken at the start of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Telemetry {
    /// One-based turn number.
    pub turn: usize,
    pub elapsed_s: f64,
    /// Whole miles of altitude.
    pub altitude_miles: f64,
    /// Remaining fraction of a mile, in feet.
    pub altitude_feet: f64,
    pub speed_mph: f64,
    pub fuel_lbs: f64,
}

impl Telemetry {
    pub fn capture(turn: usize, state: &FlightState) -> Self {
        let (altitude_miles, altitude_feet) = split_altitude(state.altitude_miles);
        Self {
            turn,
            elapsed_s: state.elapsed_s,
            altitude_miles,
            altitude_feet,
            speed_mph: miles_s_to_mph(state.velocity_miles_s),
            fuel_lbs: state.fuel_remaining_lbs(),
        }
    }
}
