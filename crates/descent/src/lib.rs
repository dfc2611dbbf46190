//! Powered lunar descent simulator.
//!
//! A descent is a sequence of fixed-length turns. At the start of each turn the pilot
//! picks a fuel rate through a [`ThrustController`]; the simulator then integrates the
//! capsule forward with a truncated rocket-equation series, shrinking its step near a
//! velocity reversal and near the surface, until the capsule is on the moon.

pub mod controller;
pub mod integrator;
pub mod landing;
pub mod simulator;
pub mod state;
pub mod telemetry;

pub use controller::{ConstantRate, ScriptExhausted, ScriptedController, ThrustController};
pub use landing::{LandingGrade, LandingOutcome};
pub use simulator::{
    Descent, DescentEvent, DescentRecorder, DescentReport, FuelRateError, FuelRateLimits, Phase,
    run_descent,
};
pub use state::FlightState;
pub use telemetry::Telemetry;
