//! Configuration models and loaders for the Lunar Lander.

use std::fs::File;
use std::path::Path;

use lander_core::constants::{
    EMPTY_WEIGHT_LBS, EXHAUST_VELOCITY, INITIAL_ALTITUDE_MILES, INITIAL_TOTAL_WEIGHT_LBS,
    INITIAL_VELOCITY_MILES_S, LUNAR_GRAVITY, MAX_FUEL_RATE_LBS_S, MIN_FUEL_RATE_LBS_S,
    TURN_SECONDS,
};
use serde::Deserialize;
use thiserror::Error;

/// Complete scenario description. Every field falls back to the classic mission.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LanderConfig {
    pub initial: InitialConditions,
    pub vehicle: VehicleConfig,
    pub environment: EnvironmentConfig,
    pub controls: ControlConfig,
}

/// State at the first radar check.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InitialConditions {
    pub altitude_miles: f64,
    pub velocity_miles_s: f64,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            altitude_miles: INITIAL_ALTITUDE_MILES,
            velocity_miles_s: INITIAL_VELOCITY_MILES_S,
        }
    }
}

/// Capsule mass properties and engine performance.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct VehicleConfig {
    pub total_weight_lbs: f64,
    pub empty_weight_lbs: f64,
    pub exhaust_velocity: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            total_weight_lbs: INITIAL_TOTAL_WEIGHT_LBS,
            empty_weight_lbs: EMPTY_WEIGHT_LBS,
            exhaust_velocity: EXHAUST_VELOCITY,
        }
    }
}

impl VehicleConfig {
    /// Fuel on board at the start of the descent.
    pub fn fuel_lbs(&self) -> f64 {
        self.total_weight_lbs - self.empty_weight_lbs
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub gravity: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            gravity: LUNAR_GRAVITY,
        }
    }
}

/// Pilot control limits: turn length and the legal non-zero burn band.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ControlConfig {
    pub turn_seconds: f64,
    pub min_fuel_rate_lbs_s: f64,
    pub max_fuel_rate_lbs_s: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            turn_seconds: TURN_SECONDS,
            min_fuel_rate_lbs_s: MIN_FUEL_RATE_LBS_S,
            max_fuel_rate_lbs_s: MAX_FUEL_RATE_LBS_S,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl LanderConfig {
    /// Reject scenarios the integrator cannot fly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("environment.gravity", self.environment.gravity)?;
        positive("vehicle.exhaust_velocity", self.vehicle.exhaust_velocity)?;
        positive("vehicle.empty_weight_lbs", self.vehicle.empty_weight_lbs)?;
        positive("controls.turn_seconds", self.controls.turn_seconds)?;
        positive("vehicle.total_weight_lbs", self.vehicle.total_weight_lbs)?;
        positive("controls.min_fuel_rate_lbs_s", self.controls.min_fuel_rate_lbs_s)?;
        positive("controls.max_fuel_rate_lbs_s", self.controls.max_fuel_rate_lbs_s)?;

        if !self.initial.altitude_miles.is_finite() || self.initial.altitude_miles < 0.0 {
            return Err(invalid(
                "initial.altitude_miles",
                format!("{} is not a non-negative altitude", self.initial.altitude_miles),
            ));
        }
        if !self.initial.velocity_miles_s.is_finite() {
            return Err(invalid(
                "initial.velocity_miles_s",
                "velocity must be finite".to_string(),
            ));
        }
        if self.vehicle.total_weight_lbs < self.vehicle.empty_weight_lbs {
            return Err(invalid(
                "vehicle.total_weight_lbs",
                format!(
                    "{} is below the empty weight {}",
                    self.vehicle.total_weight_lbs, self.vehicle.empty_weight_lbs
                ),
            ));
        }
        if self.controls.max_fuel_rate_lbs_s < self.controls.min_fuel_rate_lbs_s {
            return Err(invalid(
                "controls.max_fuel_rate_lbs_s",
                format!(
                    "{} is below the minimum rate {}",
                    self.controls.max_fuel_rate_lbs_s, self.controls.min_fuel_rate_lbs_s
                ),
            ));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be positive")))
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Load and validate a scenario from a TOML or YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LanderConfig, ConfigError> {
    let config: LanderConfig = load_record(path)?;
    config.validate()?;
    Ok(config)
}

/// Load a scenario when a path is given, otherwise fall back to the classic mission.
pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<LanderConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(LanderConfig::default()),
    }
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let is_yaml = path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);
    if is_yaml {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    } else {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
