//! Per-kind step interpreters.
//!
//! Each step goes through `begin` once, `sample` once per frame with progress
//! in `[0, 1)`, and `finish` once, which writes the exact end state.

use glam::Vec3;
use structvista_scene_core::{SceneRenderer, VisualHandle};

use crate::easing::{ease_in_cubic, ease_in_out_cubic, ease_out_bounce, flash_intensity};
use crate::step::StepParams;

pub fn begin(target: VisualHandle, params: &StepParams, scene: &mut dyn SceneRenderer) {
    match params {
        StepParams::Create => scene.set_scale(target, Vec3::ZERO),
        StepParams::Connect { from, .. } => scene.update_connector_endpoints(target, *from, *from),
        StepParams::Move { from, .. } => scene.set_position(target, *from),
        StepParams::Highlight { .. } | StepParams::Destroy | StepParams::Disconnect => {}
    }
}

pub fn sample(
    target: VisualHandle,
    params: &StepParams,
    progress: f32,
    scene: &mut dyn SceneRenderer,
) {
    let t = progress.clamp(0.0, 1.0);
    match params {
        StepParams::Move { from, to } => {
            scene.set_position(target, from.lerp(*to, ease_in_out_cubic(t)));
        }
        StepParams::Highlight { color } => {
            scene.set_highlight(target, *color, flash_intensity(t));
        }
        StepParams::Create => scene.set_scale(target, Vec3::splat(ease_out_bounce(t))),
        StepParams::Destroy | StepParams::Disconnect => {
            scene.set_scale(target, Vec3::splat(1.0 - ease_in_cubic(t)));
        }
        StepParams::Connect { from, to } => {
            scene.update_connector_endpoints(target, *from, from.lerp(*to, t));
        }
    }
}

pub fn finish(target: VisualHandle, params: &StepParams, scene: &mut dyn SceneRenderer) {
    match params {
        StepParams::Move { to, .. } => scene.set_position(target, *to),
        StepParams::Highlight { .. } => scene.clear_highlight(target),
        StepParams::Create => scene.set_scale(target, Vec3::ONE),
        StepParams::Destroy | StepParams::Disconnect => scene.set_scale(target, Vec3::ZERO),
        StepParams::Connect { from, to } => scene.update_connector_endpoints(target, *from, *to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structvista_scene_core::{Color, ObjectKind, RecordingScene};

    #[test]
    fn create_grows_from_zero_to_one() {
        let mut scene = RecordingScene::new();
        let h = scene.create_visual_node(1, Vec3::ZERO, Color::NODE);
        let params = StepParams::Create;

        begin(h, &params, &mut scene);
        assert_eq!(scene.object(h).unwrap().scale, Vec3::ZERO);
        sample(h, &params, 0.5, &mut scene);
        let mid = scene.object(h).unwrap().scale.x;
        assert!(mid > 0.0 && mid <= 1.0);
        finish(h, &params, &mut scene);
        assert_eq!(scene.object(h).unwrap().scale, Vec3::ONE);
    }

    #[test]
    fn highlight_is_cleared_on_finish() {
        let mut scene = RecordingScene::new();
        let h = scene.create_visual_node(1, Vec3::ZERO, Color::NODE);
        let params = StepParams::Highlight {
            color: Color::AMBER,
        };
        sample(h, &params, 0.1, &mut scene);
        assert_eq!(scene.object(h).unwrap().highlight.map(|(c, _)| c), Some(Color::AMBER));
        finish(h, &params, &mut scene);
        assert_eq!(scene.object(h).unwrap().highlight, None);
    }

    #[test]
    fn connect_grows_towards_target() {
        let mut scene = RecordingScene::new();
        let from = Vec3::ZERO;
        let to = Vec3::new(4.0, 0.0, 0.0);
        let h = scene.create_connector(from, to, Color::CONNECTOR, true);
        let params = StepParams::Connect { from, to };

        begin(h, &params, &mut scene);
        sample(h, &params, 0.5, &mut scene);
        match &scene.object(h).unwrap().kind {
            ObjectKind::Connector { to: end, .. } => assert_eq!(*end, Vec3::new(2.0, 0.0, 0.0)),
            other => panic!("unexpected {other:?}"),
        }
        finish(h, &params, &mut scene);
        match &scene.object(h).unwrap().kind {
            ObjectKind::Connector { to: end, .. } => assert_eq!(*end, to),
            other => panic!("unexpected {other:?}"),
        }
    }
}
