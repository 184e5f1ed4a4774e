use serde::{Deserialize, Serialize};

/// Playback state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing loaded, or reset.
    Stopped,
    /// The clock is running.
    Playing,
    /// Clock frozen; in-flight steps hold their current values.
    Paused,
    /// Step mode: the last requested step finished, waiting for the operator.
    AwaitingStep,
    /// The last sequence delivered its completion.
    Ended,
}

impl PlaybackState {
    /// Get the name of this playback state
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::AwaitingStep => "awaiting-step",
            Self::Ended => "ended",
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    #[inline]
    pub fn can_resume(&self) -> bool {
        matches!(self, Self::Paused | Self::AwaitingStep)
    }

    #[inline]
    pub fn can_pause(&self) -> bool {
        matches!(self, Self::Playing | Self::AwaitingStep)
    }
}

impl From<&str> for PlaybackState {
    fn from(s: &str) -> Self {
        match s {
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            "awaiting-step" => Self::AwaitingStep,
            "ended" => Self::Ended,
            _ => Self::Stopped,
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
