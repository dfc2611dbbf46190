//! The pilot side of the simulator: something that picks a fuel rate each turn.

use std::convert::Infallible;

use thiserror::Error;

use crate::simulator::FuelRateError;
use crate::telemetry::Telemetry;

/// Supplies fuel-rate decisions to a [`Descent`](crate::Descent).
///
/// `request_fuel_rate` is called once per turn and again after every rejection. An
/// error aborts the descent and is handed back to the caller unchanged.
pub trait ThrustController {
    type Error;

    fn request_fuel_rate(&mut self, telemetry: &Telemetry) -> Result<f64, Self::Error>;

    /// Called when `rate` was refused; the next call to `request_fuel_rate` re-prompts.
    fn rejected(&mut self, _rate: f64, _reason: &FuelRateError) {}
}

impl<T: ThrustController + ?Sized> ThrustController for &mut T {
    type Error = T::Error;

    fn request_fuel_rate(&mut self, telemetry: &Telemetry) -> Result<f64, Self::Error> {
        (**self).request_fuel_rate(telemetry)
    }

    fn rejected(&mut self, rate: f64, reason: &FuelRateError) {
        (**self).rejected(rate, reason)
    }
}

/// Burns at the same rate every turn.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRate(pub f64);

impl ThrustController for ConstantRate {
    type Error = Infallible;

    fn request_fuel_rate(&mut self, _telemetry: &Telemetry) -> Result<f64, Self::Error> {
        Ok(self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("fuel-rate script exhausted after {requests} requests")]
pub struct ScriptExhausted {
    pub requests: usize,
}

/// Replays a fixed list of answers, recording every rejection it receives.
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    rates: Vec<f64>,
    next: usize,
    rejections: Vec<(f64, FuelRateError)>,
    requests: Vec<Telemetry>,
}

impl ScriptedController {
    pub fn new<I: IntoIterator<Item = f64>>(rates: I) -> Self {
        Self {
            rates: rates.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn rejections(&self) -> &[(f64, FuelRateError)] {
        &self.rejections
    }

    /// Telemetry passed with each request, in order.
    pub fn requests(&self) -> &[Telemetry] {
        &self.requests
    }
}

impl ThrustController for ScriptedController {
    type Error = ScriptExhausted;

    fn request_fuel_rate(&mut self, telemetry: &Telemetry) -> Result<f64, Self::Error> {
        self.requests.push(*telemetry);
        let rate = self.rates.get(self.next).copied().ok_or(ScriptExhausted {
            requests: self.next,
        })?;
        self.next += 1;
        Ok(rate)
    }

    fn rejected(&mut self, rate: f64, reason: &FuelRateError) {
        self.rejections.push((rate, *reason));
    }
}
