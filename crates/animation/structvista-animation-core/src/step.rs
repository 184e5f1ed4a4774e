//! Declarative contract between structure engines and the playback engine.
//!
//! Steps never reference each other; ordering is positional. Completions are
//! plain values of the owner's choosing (`C`) that the playback engine hands
//! back through [`crate::PlaybackEvent`] once the step (or the whole sequence)
//! has finished.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use structvista_scene_core::{Color, VisualHandle};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Move,
    Highlight,
    Create,
    Destroy,
    Connect,
    Disconnect,
}

/// Kind-specific parameters. The variant decides the step's [`StepKind`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepParams {
    Move { from: Vec3, to: Vec3 },
    Highlight { color: Color },
    Create,
    Destroy,
    /// Grow a connector from `from` towards `to`.
    Connect { from: Vec3, to: Vec3 },
    Disconnect,
}

impl StepParams {
    pub fn kind(&self) -> StepKind {
        match self {
            StepParams::Move { .. } => StepKind::Move,
            StepParams::Highlight { .. } => StepKind::Highlight,
            StepParams::Create => StepKind::Create,
            StepParams::Destroy => StepKind::Destroy,
            StepParams::Connect { .. } => StepKind::Connect,
            StepParams::Disconnect => StepKind::Disconnect,
        }
    }
}

/// One visual-effect request.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationStep<C> {
    pub target: VisualHandle,
    /// Logical duration; scaled by the playback speed into milliseconds.
    pub duration: f32,
    pub params: StepParams,
    pub on_complete: Option<C>,
}

impl<C> AnimationStep<C> {
    pub fn new(target: VisualHandle, duration: f32, params: StepParams) -> Self {
        Self {
            target,
            duration,
            params,
            on_complete: None,
        }
    }

    pub fn highlight(target: VisualHandle, color: Color, duration: f32) -> Self {
        Self::new(target, duration, StepParams::Highlight { color })
    }

    pub fn create(target: VisualHandle, duration: f32) -> Self {
        Self::new(target, duration, StepParams::Create)
    }

    pub fn destroy(target: VisualHandle, duration: f32) -> Self {
        Self::new(target, duration, StepParams::Destroy)
    }

    pub fn connect(target: VisualHandle, from: Vec3, to: Vec3, duration: f32) -> Self {
        Self::new(target, duration, StepParams::Connect { from, to })
    }

    pub fn disconnect(target: VisualHandle, duration: f32) -> Self {
        Self::new(target, duration, StepParams::Disconnect)
    }

    pub fn move_to(target: VisualHandle, from: Vec3, to: Vec3, duration: f32) -> Self {
        Self::new(target, duration, StepParams::Move { from, to })
    }

    /// Attach the value delivered when this step finishes.
    pub fn with_completion(mut self, completion: C) -> Self {
        self.on_complete = Some(completion);
        self
    }

    #[inline]
    pub fn kind(&self) -> StepKind {
        self.params.kind()
    }
}

/// Ordered steps plus a completion delivered exactly once after the last one.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSequence<C> {
    pub steps: Vec<AnimationStep<C>>,
    pub on_complete: Option<C>,
}

impl<C> Default for AnimationSequence<C> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            on_complete: None,
        }
    }
}

impl<C> AnimationSequence<C> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, step: AnimationStep<C>) {
        self.steps.push(step);
    }

    pub fn with_completion(mut self, completion: C) -> Self {
        self.on_complete = Some(completion);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(AnimationStep::kind).collect()
    }

    /// `(target, colour)` of every highlight step, in order.
    pub fn highlights(&self) -> Vec<(VisualHandle, Color)> {
        self.steps
            .iter()
            .filter_map(|s| match s.params {
                StepParams::Highlight { color } => Some((s.target, color)),
                _ => None,
            })
            .collect()
    }

    /// Every completion in delivery order: step completions first, then the
    /// sequence completion. Used to settle a sequence without playing it.
    pub fn into_completions(self) -> impl Iterator<Item = C> {
        self.steps
            .into_iter()
            .filter_map(|s| s.on_complete)
            .chain(self.on_complete)
    }
}

impl<C> Extend<AnimationStep<C>> for AnimationSequence<C> {
    fn extend<I: IntoIterator<Item = AnimationStep<C>>>(&mut self, iter: I) {
        self.steps.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_come_out_in_delivery_order() {
        let mut seq: AnimationSequence<&str> = AnimationSequence::new().with_completion("seq");
        seq.push(AnimationStep::highlight(VisualHandle(0), Color::AMBER, 0.3));
        seq.push(AnimationStep::destroy(VisualHandle(0), 0.5).with_completion("destroy"));
        seq.push(AnimationStep::disconnect(VisualHandle(1), 0.3).with_completion("disconnect"));

        assert_eq!(
            seq.kinds(),
            vec![StepKind::Highlight, StepKind::Destroy, StepKind::Disconnect]
        );
        let all: Vec<_> = seq.into_completions().collect();
        assert_eq!(all, vec!["destroy", "disconnect", "seq"]);
    }

    #[test]
    fn params_serialize_with_kind_tag() {
        let json = serde_json::to_value(StepParams::Highlight {
            color: Color::GREEN,
        })
        .unwrap();
        assert_eq!(json["kind"], "highlight");
        assert_eq!(json["color"], 0x4caf50);
    }
}
