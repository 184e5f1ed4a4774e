use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("unknown structure kind '{0}' (expected linked-list, binary-tree or graph)")]
    UnknownKind(String),
    #[error("invalid structure config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("structure config field '{field}' must be positive and finite, got {value}")]
    InvalidConfig { field: &'static str, value: f32 },
}
