//! Turn-based lunar landing simulation.
//!
//! The physics lives in the `lander_descent` crate; configuration, unit helpers and
//! flight-log export sit in their own crates. This library re-exports them so
//! front-ends (the `lunar` console game, tests) depend on a single crate.

pub use lander_config as config;
pub use lander_core as core;
pub use lander_descent as descent;
pub use lander_export as export;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
