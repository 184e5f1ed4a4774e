//! Events emitted by the playback engine.
//!
//! Completions travel inside events; the owner of the sequence applies them in
//! the order received.

use crate::ids::Generation;
use crate::step::StepKind;

#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent<C> {
    SequenceStarted {
        generation: Generation,
        steps: usize,
    },
    StepStarted {
        generation: Generation,
        index: usize,
        kind: StepKind,
    },
    StepCompleted {
        generation: Generation,
        index: usize,
        completion: Option<C>,
    },
    /// Delivered exactly once per sequence that runs to its end.
    SequenceCompleted {
        generation: Generation,
        completion: Option<C>,
    },
    /// A sequence was cut short by reset or by a newer sequence. Carries every
    /// completion it had not yet delivered, step completions first.
    Superseded {
        generation: Generation,
        completions: Vec<C>,
    },
}

impl<C> PlaybackEvent<C> {
    pub fn generation(&self) -> Generation {
        match self {
            PlaybackEvent::SequenceStarted { generation, .. }
            | PlaybackEvent::StepStarted { generation, .. }
            | PlaybackEvent::StepCompleted { generation, .. }
            | PlaybackEvent::SequenceCompleted { generation, .. }
            | PlaybackEvent::Superseded { generation, .. } => *generation,
        }
    }

    /// Completions carried by this event, in delivery order.
    pub fn into_completions(self) -> Vec<C> {
        match self {
            PlaybackEvent::StepCompleted { completion, .. }
            | PlaybackEvent::SequenceCompleted { completion, .. } => {
                completion.into_iter().collect()
            }
            PlaybackEvent::Superseded { completions, .. } => completions,
            PlaybackEvent::SequenceStarted { .. } | PlaybackEvent::StepStarted { .. } => Vec::new(),
        }
    }

    #[inline]
    pub fn is_sequence_completed(&self) -> bool {
        matches!(self, PlaybackEvent::SequenceCompleted { .. })
    }
}
