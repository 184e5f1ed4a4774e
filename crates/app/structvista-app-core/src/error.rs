use structvista_animation_core::ConfigError;
use structvista_structures_core::{StructureError, StructureKind};
use thiserror::Error;

use crate::command::Status;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("select a data structure first")]
    NoStructure,
    #[error("current structure ({kind}) does not support {capability}")]
    Unsupported {
        kind: StructureKind,
        capability: &'static str,
    },
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error("playback config: {0}")]
    Playback(#[from] ConfigError),
    #[error("app config json parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("app config value out of range: {field} = {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

impl From<&AppError> for Status {
    fn from(err: &AppError) -> Self {
        Status::error(err.to_string())
    }
}
