use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::engine::body::STANDARD_GRAVITY;
use crate::engine::fixed_math::FixedNum;

#[cfg(test)]
mod tests;

const DEFAULT_TICK_RATE: f64 = 20.0;

/// Static configuration loaded once before a world is built. These values
/// define the physical constants of a simulation and must not change while it
/// runs, or peers replaying the same inputs would diverge.
///
/// Human-edited, so fields are plain floats. They are converted to fixed point
/// exactly once, through [`SimConfig::from`].
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InitialConfig {
    /// Gravitational acceleration; scales every body's normal reaction.
    pub gravitation: f64,
    /// Sliding friction coefficient.
    pub friction_multiplier: f64,
    /// Ticks per second used by [`World::step`](crate::engine::world::World::step).
    pub tick_rate: f64,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            gravitation: STANDARD_GRAVITY.to_f64(),
            friction_multiplier: 0.01,
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl InitialConfig {
    pub fn from_ron_str(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }
}

/// Load the initial configuration from a RON file.
///
/// A missing or malformed file is logged and replaced by [`InitialConfig::default`].
pub fn load_initial_config(path: impl AsRef<Path>) -> InitialConfig {
    let path = path.as_ref();

    match std::fs::read_to_string(path) {
        Ok(contents) => match InitialConfig::from_ron_str(&contents) {
            Ok(config) => {
                info!("Loaded initial config from {}", path.display());
                config
            }
            Err(e) => {
                error!("Failed to parse initial config: {}", e);
                error!("Using default InitialConfig");
                InitialConfig::default()
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            error!("Using default InitialConfig");
            InitialConfig::default()
        }
    }
}

/// Fixed-point simulation constants consumed by a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub gravitation: FixedNum,
    pub friction_multiplier: FixedNum,
    /// Duration of one tick, `1 / tick_rate`.
    pub tick_delta: FixedNum,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from(&InitialConfig::default())
    }
}

impl From<&InitialConfig> for SimConfig {
    fn from(config: &InitialConfig) -> Self {
        let tick_rate = if config.tick_rate.is_finite() && config.tick_rate > 0.0 {
            FixedNum::from_f64(config.tick_rate)
        } else {
            warn!(
                "Invalid tick_rate {}, falling back to {} Hz",
                config.tick_rate, DEFAULT_TICK_RATE
            );
            FixedNum::from_f64(DEFAULT_TICK_RATE)
        };

        Self {
            gravitation: FixedNum::from_f64(config.gravitation),
            friction_multiplier: FixedNum::from_f64(config.friction_multiplier),
            // Rates above 10^6 Hz truncate to zero; clamp to the smallest step instead
            tick_delta: FixedNum::ONE
                .checked_div(tick_rate)
                .unwrap_or(FixedNum::EPSILON)
                .max(FixedNum::EPSILON),
        }
    }
}
