use serde::{Deserialize, Serialize};
use structvista_animation_core::{ConfigError, PlaybackConfig};
use structvista_structures_core::StructureConfig;

use crate::error::AppError;

/// Everything a host needs to configure an app instance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub playback: PlaybackConfig,
    pub structures: StructureConfig,
    /// Frame length used by [`crate::StructVistaApp::run_until_idle`].
    pub frame_ms: f64,
    /// Upper bound on frames `run_until_idle` will advance.
    pub max_idle_frames: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            structures: StructureConfig::default(),
            frame_ms: 16.0,
            max_idle_frames: 100_000,
        }
    }
}

impl AppConfig {
    /// Parse and validate; missing sections and fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let cfg: AppConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let ms_per_unit = self.playback.ms_per_unit;
        if !ms_per_unit.is_finite() || ms_per_unit < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "ms_per_unit",
                value: ms_per_unit,
            }
            .into());
        }
        if !self.frame_ms.is_finite() || self.frame_ms <= 0.0 {
            return Err(AppError::OutOfRange {
                field: "frame_ms",
                value: self.frame_ms,
            });
        }
        self.structures.validate()?;
        Ok(())
    }
}
