//! Core units, constants, and shared primitives for the Lunar Lander workspace.

/// Classic descent constants. Distances are in miles, speeds in miles per second,
/// weights in pounds, and times in seconds unless stated otherwise.
pub mod constants {
    /// Altitude at the first radar check (miles).
    pub const INITIAL_ALTITUDE_MILES: f64 = 120.0;
    /// Downward speed at the first radar check (miles/sec).
    pub const INITIAL_VELOCITY_MILES_S: f64 = 1.0;
    /// Capsule plus full fuel load (lbs).
    pub const INITIAL_TOTAL_WEIGHT_LBS: f64 = 32_500.0;
    /// Capsule without fuel (lbs).
    pub const EMPTY_WEIGHT_LBS: f64 = 16_500.0;
    /// Lunar gravitational acceleration in miles/sec².
    pub const LUNAR_GRAVITY: f64 = 0.001;
    /// Thrust per pound of fuel burned.
    pub const EXHAUST_VELOCITY: f64 = 1.8;
    /// Length of one pilot decision window (sec).
    pub const TURN_SECONDS: f64 = 10.0;
    /// Smallest non-zero burn rate the engine supports (lbs/sec).
    pub const MIN_FUEL_RATE_LBS_S: f64 = 8.0;
    /// Largest burn rate the engine supports (lbs/sec).
    pub const MAX_FUEL_RATE_LBS_S: f64 = 200.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Feet per statute mile.
    pub const FEET_PER_MILE: f64 = 5_280.0;
    /// Seconds per hour.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;

    /// Convert miles to feet.
    #[inline]
    pub fn miles_to_feet(v: f64) -> f64 {
        v * FEET_PER_MILE
    }

    /// Convert miles per second to miles per hour.
    #[inline]
    pub fn miles_s_to_mph(v: f64) -> f64 {
        v * SECONDS_PER_HOUR
    }

    /// Split an altitude into whole miles and the remaining fraction expressed in feet.
    #[inline]
    pub fn split_altitude(altitude_miles: f64) -> (f64, f64) {
        let whole = altitude_miles.trunc();
        (whole, miles_to_feet(altitude_miles - whole))
    }
}

/// Tolerances used by the descent integrator.
pub mod tolerance {
    /// Remaining fuel below this is treated as empty tanks (lbs).
    pub const FUEL_EPSILON_LBS: f64 = 0.001;
    /// Remaining turn time below this ends the turn (sec).
    pub const TURN_EPSILON_S: f64 = 0.001;
    /// The touchdown refinement stops once its step shrinks below this (sec).
    pub const TOUCHDOWN_STEP_S: f64 = 0.005;
    /// Padding added to the zero-crossing refinement step (sec).
    pub const ZERO_CROSSING_PAD_S: f64 = 0.05;
}
