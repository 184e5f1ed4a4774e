//! StructVista animation core (renderer-agnostic).
//!
//! Structure engines describe what should be shown as an [`AnimationSequence`];
//! the [`PlaybackEngine`] turns that description into timed renderer calls.
//! Time is driven by the host calling [`PlaybackEngine::update`] once per frame.

pub mod config;
pub mod easing;
pub mod effects;
pub mod engine;
pub mod error;
pub mod events;
pub mod ids;
pub mod state;
pub mod step;

pub use config::{PlaybackConfig, Speed};
pub use engine::PlaybackEngine;
pub use error::ConfigError;
pub use events::PlaybackEvent;
pub use ids::{Generation, GenerationCounter};
pub use state::PlaybackState;
pub use step::{AnimationSequence, AnimationStep, StepKind, StepParams};
