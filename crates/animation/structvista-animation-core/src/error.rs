//! Error types for playback configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config json parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config value out of range: {field} = {value}")]
    OutOfRange { field: &'static str, value: f64 },
}
