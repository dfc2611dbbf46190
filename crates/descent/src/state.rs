//! Mutable physical state of one descent.

use lander_config::LanderConfig;
use serde::Serialize;

use crate::integrator::Candidate;

/// Everything the integrator needs to advance the capsule. One value per play-through.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightState {
    /// Height above the surface (miles).
    pub altitude_miles: f64,
    /// Downward speed (miles/sec); negative while climbing.
    pub velocity_miles_s: f64,
    /// Capsule plus remaining fuel (lbs).
    pub total_weight_lbs: f64,
    pub empty_weight_lbs: f64,
    pub gravity: f64,
    /// Thrust per pound of fuel burned.
    pub exhaust_velocity: f64,
    pub elapsed_s: f64,
    /// Time left in the current decision window (sec).
    pub turn_remaining_s: f64,
    /// Burn rate chosen for the current turn (lbs/sec).
    pub fuel_rate_lbs_s: f64,
}

impl FlightState {
    /// State at the first radar check of the given scenario.
    pub fn from_config(config: &LanderConfig) -> Self {
        Self {
            altitude_miles: config.initial.altitude_miles,
            velocity_miles_s: config.initial.velocity_miles_s,
            total_weight_lbs: config.vehicle.total_weight_lbs,
            empty_weight_lbs: config.vehicle.empty_weight_lbs,
            gravity: config.environment.gravity,
            exhaust_velocity: config.vehicle.exhaust_velocity,
            elapsed_s: 0.0,
            turn_remaining_s: 0.0,
            fuel_rate_lbs_s: 0.0,
        }
    }

    /// The classic 120-mile descent.
    pub fn classic() -> Self {
        Self::from_config(&LanderConfig::default())
    }

    pub fn fuel_remaining_lbs(&self) -> f64 {
        self.total_weight_lbs - self.empty_weight_lbs
    }

    /// Seconds until the tanks run dry at the current rate, or `None` while coasting.
    pub fn time_to_burnout_s(&self) -> Option<f64> {
        if self.fuel_rate_lbs_s > 0.0 {
            Some(self.fuel_remaining_lbs() / self.fuel_rate_lbs_s)
        } else {
            None
        }
    }

    /// Engine acceleration at the current weight (miles/sec²).
    pub fn thrust_acceleration(&self) -> f64 {
        if self.fuel_rate_lbs_s > 0.0 {
            self.exhaust_velocity * self.fuel_rate_lbs_s / self.total_weight_lbs
        } else {
            0.0
        }
    }

    /// Accept an integration step of `step_s` seconds that ended at `candidate`.
    pub fn commit(&mut self, step_s: f64, candidate: Candidate) {
        self.elapsed_s += step_s;
        self.turn_remaining_s -= step_s;
        // Weight never drops below the dry capsule, even when a refinement step
        // outlasts the remaining fuel.
        self.total_weight_lbs =
            (self.total_weight_lbs - step_s * self.fuel_rate_lbs_s).max(self.empty_weight_lbs);
        self.altitude_miles = candidate.altitude_miles;
        self.velocity_miles_s = candidate.velocity_miles_s;
    }
}
