use std::fmt;

use serde::{Deserialize, Serialize};
use structvista_structures_core::StructureKind;

/// Operator commands, tagged by `"cmd"` in JSON:
/// `{ "cmd": "insert", "value": 5 }`, `{ "cmd": "play" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum Command {
    SelectStructure { kind: StructureKind },
    Insert { value: i64 },
    Delete { value: i64 },
    Search { value: i64 },
    Clear,
    AddEdge { from: i64, to: i64 },
    RemoveEdge { from: i64, to: i64 },
    ShortestPath { start: i64, end: i64 },
    SetStepMode { enabled: bool },
    Play,
    NextStep,
    Pause,
    Reset,
    SetSpeed { level: i64 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SelectStructure { .. } => "select-structure",
            Command::Insert { .. } => "insert",
            Command::Delete { .. } => "delete",
            Command::Search { .. } => "search",
            Command::Clear => "clear",
            Command::AddEdge { .. } => "add-edge",
            Command::RemoveEdge { .. } => "remove-edge",
            Command::ShortestPath { .. } => "shortest-path",
            Command::SetStepMode { .. } => "set-step-mode",
            Command::Play => "play",
            Command::NextStep => "next-step",
            Command::Pause => "pause",
            Command::Reset => "reset",
            Command::SetSpeed { .. } => "set-speed",
        }
    }

    /// Commands that act on the selected structure rather than on playback.
    pub fn targets_structure(&self) -> bool {
        matches!(
            self,
            Command::Insert { .. }
                | Command::Delete { .. }
                | Command::Search { .. }
                | Command::Clear
                | Command::AddEdge { .. }
                | Command::RemoveEdge { .. }
                | Command::ShortestPath { .. }
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Status line shown to the operator after a command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_info(&self) -> bool {
        self.level == StatusLevel::Info
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
