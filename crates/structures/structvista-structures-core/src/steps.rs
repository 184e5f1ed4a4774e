//! Step builders shared by the engines, parameterised by [`StructureConfig`].

use glam::Vec3;
use structvista_animation_core::AnimationStep;
use structvista_scene_core::VisualHandle;

use crate::completion::{Completion, ConnectionKey};
use crate::config::StructureConfig;

pub type Step = AnimationStep<Completion>;

/// Amber pass over a node that is not the one being looked for.
pub fn visit(cfg: &StructureConfig, target: VisualHandle) -> Step {
    AnimationStep::highlight(target, cfg.palette.visit, cfg.visit_duration)
}

/// Green highlight on a match.
pub fn found(cfg: &StructureConfig, target: VisualHandle) -> Step {
    AnimationStep::highlight(target, cfg.palette.found, cfg.effect_duration)
}

/// Short green highlight (old list tail, shortest-path end node).
pub fn mark(cfg: &StructureConfig, target: VisualHandle) -> Step {
    AnimationStep::highlight(target, cfg.palette.found, cfg.visit_duration)
}

/// Red highlight on the node about to go.
pub fn doomed(cfg: &StructureConfig, target: VisualHandle) -> Step {
    AnimationStep::highlight(target, cfg.palette.removal, cfg.visit_duration)
}

pub fn create(cfg: &StructureConfig, target: VisualHandle) -> Step {
    AnimationStep::create(target, cfg.effect_duration)
}

pub fn connect(cfg: &StructureConfig, connector: VisualHandle, from: Vec3, to: Vec3) -> Step {
    AnimationStep::connect(connector, from, to, cfg.effect_duration)
}

/// Destroy a node's visual; the step's completion releases it.
pub fn destroy(cfg: &StructureConfig, value: i64, handle: VisualHandle) -> Step {
    AnimationStep::destroy(handle, cfg.effect_duration)
        .with_completion(Completion::ReleaseNode { value, handle })
}

/// Fade a connector out; the step's completion releases it.
pub fn disconnect(cfg: &StructureConfig, key: ConnectionKey, handle: VisualHandle) -> Step {
    AnimationStep::disconnect(handle, cfg.visit_duration)
        .with_completion(Completion::ReleaseConnector { key, handle })
}
