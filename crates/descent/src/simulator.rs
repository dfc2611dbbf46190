//! Turn/step state machine driving one descent from first radar check to touchdown.

use lander_config::{ControlConfig, LanderConfig};
use lander_core::tolerance::{
    FUEL_EPSILON_LBS, TOUCHDOWN_STEP_S, TURN_EPSILON_S, ZERO_CROSSING_PAD_S,
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::controller::ThrustController;
use crate::integrator::{Candidate, integrate};
use crate::landing::LandingOutcome;
use crate::state::FlightState;
use crate::telemetry::Telemetry;

/// Reasons a requested fuel rate is refused. All of them are recoverable by asking again.
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum FuelRateError {
    #[error("fuel rate must be a finite number")]
    NotFinite,
    #[error("fuel rate {0} is negative")]
    Negative(f64),
    #[error("fuel rate {rate} is below the engine minimum of {min}")]
    BelowMinimum { rate: f64, min: f64 },
    #[error("fuel rate {rate} exceeds the engine maximum of {max}")]
    AboveMaximum { rate: f64, max: f64 },
    #[error("the simulator is not waiting for a fuel rate")]
    NotAwaitingInput,
}

/// Legal burn rates: zero, or anywhere in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelRateLimits {
    pub min_lbs_s: f64,
    pub max_lbs_s: f64,
}

impl Default for FuelRateLimits {
    fn default() -> Self {
        Self::from_controls(&ControlConfig::default())
    }
}

impl FuelRateLimits {
    pub fn from_controls(controls: &ControlConfig) -> Self {
        Self {
            min_lbs_s: controls.min_fuel_rate_lbs_s,
            max_lbs_s: controls.max_fuel_rate_lbs_s,
        }
    }

    pub fn check(&self, rate: f64) -> Result<f64, FuelRateError> {
        if !rate.is_finite() {
            Err(FuelRateError::NotFinite)
        } else if rate < 0.0 {
            Err(FuelRateError::Negative(rate))
        } else if rate > self.max_lbs_s {
            Err(FuelRateError::AboveMaximum {
                rate,
                max: self.max_lbs_s,
            })
        } else if rate > 0.0 && rate < self.min_lbs_s {
            Err(FuelRateError::BelowMinimum {
                rate,
                min: self.min_lbs_s,
            })
        } else {
            Ok(rate)
        }
    }
}

/// Where the descent currently is in its turn/step cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the pilot to choose the next turn's fuel rate.
    AwaitingThrustInput,
    /// Integrating forward within the current turn.
    Stepping,
    /// Tanks ran dry; the rest of the fall is solved in closed form.
    FuelExhausted,
    /// Near the surface; shrinking steps converge the altitude to zero.
    FreeFallToImpact,
    /// On the moon.
    Landed,
}

/// Observable milestones of a descent, in the order they happen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DescentEvent {
    /// Radar check at the start of a turn, emitted before the fuel rate is requested.
    TurnStarted(Telemetry),
    /// Fuel ran out at `elapsed_s`.
    FuelExhausted { elapsed_s: f64 },
    /// Touchdown. Always the last event.
    Landed(LandingOutcome),
}

/// Everything a finished descent produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DescentReport {
    pub telemetry: Vec<Telemetry>,
    pub fuel_exhausted_at_s: Option<f64>,
    pub outcome: LandingOutcome,
}

/// Folds a stream of [`DescentEvent`]s into a [`DescentReport`].
#[derive(Debug, Clone, Default)]
pub struct DescentRecorder {
    telemetry: Vec<Telemetry>,
    fuel_exhausted_at_s: Option<f64>,
}

impl DescentRecorder {
    /// Record `event`; returns the finished report once the capsule has landed.
    pub fn record(&mut self, event: &DescentEvent) -> Option<DescentReport> {
        match *event {
            DescentEvent::TurnStarted(snapshot) => {
                self.telemetry.push(snapshot);
                None
            }
            DescentEvent::FuelExhausted { elapsed_s } => {
                self.fuel_exhausted_at_s = Some(elapsed_s);
                None
            }
            DescentEvent::Landed(outcome) => Some(DescentReport {
                telemetry: std::mem::take(&mut self.telemetry),
                fuel_exhausted_at_s: self.fuel_exhausted_at_s.take(),
                outcome,
            }),
        }
    }
}

/// One play-through. Iterating it yields [`DescentEvent`]s and calls the controller
/// lazily, once per turn, right after that turn's telemetry has been yielded.
#[derive(Debug)]
pub struct Descent<C> {
    state: FlightState,
    limits: FuelRateLimits,
    turn_seconds: f64,
    controller: C,
    phase: Phase,
    /// Duration of the last attempted step, carried into the touchdown refinement.
    step_s: f64,
    turn: usize,
    announced: bool,
    finished: bool,
}

impl<C: ThrustController> Descent<C> {
    /// Start the classic mission.
    pub fn new(controller: C) -> Self {
        Self::from_config(&LanderConfig::default(), controller)
    }

    pub fn from_config(config: &LanderConfig, controller: C) -> Self {
        Self::with_state(
            FlightState::from_config(config),
            FuelRateLimits::from_controls(&config.controls),
            config.controls.turn_seconds,
            controller,
        )
    }

    pub fn with_state(
        state: FlightState,
        limits: FuelRateLimits,
        turn_seconds: f64,
        controller: C,
    ) -> Self {
        Self {
            state,
            limits,
            turn_seconds,
            controller,
            phase: Phase::AwaitingThrustInput,
            step_s: 0.0,
            turn: 0,
            announced: false,
            finished: false,
        }
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn into_controller(self) -> C {
        self.controller
    }

    /// Radar reading for the current (or upcoming) turn.
    pub fn telemetry(&self) -> Telemetry {
        Telemetry::capture(self.turn.max(1), &self.state)
    }

    /// Offer a fuel rate for the upcoming turn. A refused rate leaves the state untouched.
    pub fn submit_fuel_rate(&mut self, rate: f64) -> Result<(), FuelRateError> {
        if self.phase != Phase::AwaitingThrustInput {
            return Err(FuelRateError::NotAwaitingInput);
        }
        let rate = self.limits.check(rate)?;
        self.state.fuel_rate_lbs_s = rate;
        self.state.turn_remaining_s = self.turn_seconds;
        self.phase = Phase::Stepping;
        debug!(
            turn = self.turn.max(1),
            fuel_rate = rate,
            elapsed_s = self.state.elapsed_s,
            "turn accepted"
        );
        Ok(())
    }

    /// Drive the descent to touchdown, collecting every event.
    pub fn run(mut self) -> Result<DescentReport, C::Error> {
        let mut recorder = DescentRecorder::default();
        loop {
            let event = self.advance()?;
            if let Some(report) = recorder.record(&event) {
                return Ok(report);
            }
        }
    }

    fn advance(&mut self) -> Result<DescentEvent, C::Error> {
        loop {
            match self.phase {
                Phase::AwaitingThrustInput => {
                    if !self.announced {
                        self.announced = true;
                        self.turn += 1;
                        return Ok(DescentEvent::TurnStarted(self.telemetry()));
                    }
                    self.await_fuel_rate()?;
                }
                Phase::Stepping => self.phase = self.step_turn(),
                Phase::FuelExhausted => {
                    let elapsed_s = self.state.elapsed_s;
                    debug!(elapsed_s, "fuel exhausted");
                    self.coast_to_impact();
                    self.phase = Phase::Landed;
                    return Ok(DescentEvent::FuelExhausted { elapsed_s });
                }
                Phase::FreeFallToImpact => {
                    self.settle_to_surface();
                    self.phase = Phase::Landed;
                }
                Phase::Landed => {
                    self.finished = true;
                    let outcome = LandingOutcome::from_state(&self.state);
                    debug!(
                        elapsed_s = outcome.elapsed_s,
                        impact_mph = outcome.impact_mph,
                        grade = ?outcome.grade,
                        "landed"
                    );
                    return Ok(DescentEvent::Landed(outcome));
                }
            }
        }
    }

    fn await_fuel_rate(&mut self) -> Result<(), C::Error> {
        let telemetry = self.telemetry();
        loop {
            let rate = self.controller.request_fuel_rate(&telemetry)?;
            match self.submit_fuel_rate(rate) {
                Ok(()) => return Ok(()),
                Err(reason) => {
                    debug!(rate, %reason, "fuel rate rejected");
                    self.controller.rejected(rate, &reason);
                }
            }
        }
    }

    /// One pass of the in-turn loop; returns the phase to enter next.
    fn step_turn(&mut self) -> Phase {
        if self.state.fuel_remaining_lbs() < FUEL_EPSILON_LBS {
            return Phase::FuelExhausted;
        }
        if self.state.turn_remaining_s < TURN_EPSILON_S {
            self.announced = false;
            return Phase::AwaitingThrustInput;
        }

        let mut step_s = self.state.turn_remaining_s;
        if let Some(burnout_s) = self.state.time_to_burnout_s() {
            step_s = step_s.min(burnout_s);
        }

        let candidate = integrate(&self.state, step_s);
        self.step_s = step_s;
        if candidate.altitude_miles <= 0.0 {
            debug!(elapsed_s = self.state.elapsed_s, step_s, "surface inside step");
            return Phase::FreeFallToImpact;
        }
        if self.state.velocity_miles_s > 0.0
            && candidate.velocity_miles_s < 0.0
            && self.state.fuel_rate_lbs_s > 0.0
        {
            return self.refine_zero_crossing();
        }

        self.accept(step_s, candidate);
        Phase::Stepping
    }

    /// The step would flip the capsule from falling to climbing. Replace it with one
    /// sized to end near zero vertical speed, then resume the current turn.
    fn refine_zero_crossing(&mut self) -> Phase {
        let s = &self.state;
        let zk = s.exhaust_velocity * s.fuel_rate_lbs_s;
        let w = (1.0 - s.total_weight_lbs * s.gravity / zk) / 2.0;
        let step_s = s.total_weight_lbs * s.velocity_miles_s
            / (zk * (w + (w * w + s.velocity_miles_s / s.exhaust_velocity).sqrt()))
            + ZERO_CROSSING_PAD_S;

        let candidate = integrate(s, step_s);
        self.step_s = step_s;
        debug!(
            elapsed_s = self.state.elapsed_s,
            step_s,
            velocity = candidate.velocity_miles_s,
            "velocity zero-crossing refined"
        );
        if candidate.altitude_miles <= 0.0 {
            return Phase::FreeFallToImpact;
        }
        // Whichever sign the velocity settles on, the turn carries on from here.
        self.accept(step_s, candidate);
        Phase::Stepping
    }

    /// Shrink the step until it lands exactly on the surface.
    fn settle_to_surface(&mut self) {
        debug!(elapsed_s = self.state.elapsed_s, "touchdown refinement");
        while self.step_s >= TOUCHDOWN_STEP_S {
            let s = &self.state;
            let a = s.altitude_miles;
            let v = s.velocity_miles_s;
            let step_s =
                2.0 * a / (v + (v * v + 2.0 * a * (s.gravity - s.thrust_acceleration())).sqrt());
            let candidate = integrate(s, step_s);
            self.accept(step_s, candidate);
            self.step_s = step_s;
        }
    }

    /// Unpowered fall from the current altitude, solved exactly.
    fn coast_to_impact(&mut self) {
        let s = &mut self.state;
        let v = s.velocity_miles_s;
        let step_s = ((v * v + 2.0 * s.altitude_miles * s.gravity).sqrt() - v) / s.gravity;
        s.velocity_miles_s += s.gravity * step_s;
        s.elapsed_s += step_s;
    }

    fn accept(&mut self, step_s: f64, candidate: Candidate) {
        self.state.commit(step_s, candidate);
        trace!(
            step_s,
            altitude = self.state.altitude_miles,
            velocity = self.state.velocity_miles_s,
            weight = self.state.total_weight_lbs,
            "step committed"
        );
    }
}

impl<C: ThrustController> Iterator for Descent<C> {
    type Item = Result<DescentEvent, C::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let event = self.advance();
        if event.is_err() {
            self.finished = true;
        }
        Some(event)
    }
}

/// Fly one complete descent of `config` with `controller` at the stick.
pub fn run_descent<C: ThrustController>(
    config: &LanderConfig,
    controller: C,
) -> Result<DescentReport, C::Error> {
    Descent::from_config(config, controller).run()
}
