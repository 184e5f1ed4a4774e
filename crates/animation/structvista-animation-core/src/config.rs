//! Playback configuration and speed levels.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Operator-facing speed level, always within `1..=10`.
///
/// A step of logical duration `d` plays for `d * (11 - level) * ms_per_unit`
/// milliseconds, so level 10 is the fastest and level 1 the slowest.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Clamp any requested level into range.
    pub fn new(level: i64) -> Self {
        Self(level.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    #[inline]
    pub fn level(self) -> u8 {
        self.0
    }

    /// Multiplier applied to logical durations.
    #[inline]
    pub fn factor(self) -> f64 {
        f64::from(11 - self.0)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed(5)
    }
}

impl TryFrom<i64> for Speed {
    type Error = std::convert::Infallible;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Ok(Speed::new(level))
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> u8 {
        speed.0
    }
}

/// Configuration for the playback engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Speed level used until the operator changes it.
    pub speed: Speed,
    /// Milliseconds per logical duration unit at factor 1.
    pub ms_per_unit: f64,
    /// Start in operator-paced step mode instead of auto-play.
    pub step_mode: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: Speed::default(),
            ms_per_unit: 100.0,
            step_mode: false,
        }
    }
}

impl PlaybackConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: PlaybackConfig = serde_json::from_str(json)?;
        if !cfg.ms_per_unit.is_finite() || cfg.ms_per_unit < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "ms_per_unit",
                value: cfg.ms_per_unit,
            });
        }
        Ok(cfg)
    }

    /// Wall-clock length of a step with logical `duration` at `speed`.
    #[inline]
    pub fn scaled_ms(&self, duration: f32, speed: Speed) -> f64 {
        f64::from(duration.max(0.0)) * speed.factor() * self.ms_per_unit
    }
}
