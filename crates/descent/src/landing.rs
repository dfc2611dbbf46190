//! Touchdown classification.

use lander_core::units::miles_s_to_mph;
use serde::Serialize;

use crate::state::FlightState;

/// Crater depth in feet per mph of impact speed.
const CRATER_FEET_PER_MPH: f64 = 0.277777;

/// Qualitative landing result, ordered from best to worst.
///
/// Every threshold is an inclusive upper bound on impact speed in mph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LandingGrade {
    /// At most 1 mph.
    Perfect,
    /// At most 10 mph.
    Good,
    /// At most 22 mph; the crew survives.
    Poor,
    /// At most 40 mph.
    CraftDamaged,
    /// At most 60 mph; the crew has a few hours of oxygen.
    CrashLanding,
    /// Faster than 60 mph. No survivors.
    Destroyed { crater_depth_ft: f64 },
}

impl LandingGrade {
    pub fn classify(impact_mph: f64) -> Self {
        if impact_mph <= 1.0 {
            Self::Perfect
        } else if impact_mph <= 10.0 {
            Self::Good
        } else if impact_mph <= 22.0 {
            Self::Poor
        } else if impact_mph <= 40.0 {
            Self::CraftDamaged
        } else if impact_mph <= 60.0 {
            Self::CrashLanding
        } else {
            Self::Destroyed {
                crater_depth_ft: impact_mph * CRATER_FEET_PER_MPH,
            }
        }
    }

    pub fn survived(&self) -> bool {
        !matches!(self, Self::Destroyed { .. })
    }

    pub fn crater_depth_ft(&self) -> Option<f64> {
        match self {
            Self::Destroyed { crater_depth_ft } => Some(*crater_depth_ft),
            _ => None,
        }
    }
}

/// Terminal report for one descent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LandingOutcome {
    pub elapsed_s: f64,
    pub impact_mph: f64,
    pub fuel_remaining_lbs: f64,
    pub grade: LandingGrade,
}

impl LandingOutcome {
    pub fn from_state(state: &FlightState) -> Self {
        let impact_mph = miles_s_to_mph(state.velocity_miles_s);
        Self {
            elapsed_s: state.elapsed_s,
            impact_mph,
            fuel_remaining_lbs: state.fuel_remaining_lbs(),
            grade: LandingGrade::classify(impact_mph),
        }
    }
}
