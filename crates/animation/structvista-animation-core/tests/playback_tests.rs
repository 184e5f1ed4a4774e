use approx::assert_abs_diff_eq;
use glam::Vec3;
use structvista_animation_core::{
    AnimationSequence, AnimationStep, PlaybackConfig, PlaybackEngine, PlaybackEvent,
    PlaybackState, Speed, StepKind,
};
use structvista_scene_core::{Color, ObjectKind, RecordingScene, SceneCall, SceneRenderer, VisualHandle};

/// Completion payload used throughout: a label per step plus the sequence's own.
type Label = &'static str;

fn node(scene: &mut RecordingScene, value: i64) -> VisualHandle {
    scene.create_visual_node(value, Vec3::ZERO, Color::NODE)
}

/// highlight(0.5) -> destroy(0.25); 300ms + 150ms at the default speed.
fn highlight_then_destroy(scene: &mut RecordingScene) -> (VisualHandle, AnimationSequence<Label>) {
    let h = node(scene, 1);
    let mut seq = AnimationSequence::new().with_completion("sequence");
    seq.push(AnimationStep::highlight(h, Color::AMBER, 0.5).with_completion("highlight"));
    seq.push(AnimationStep::destroy(h, 0.25).with_completion("destroy"));
    (h, seq)
}

fn completions(events: Vec<PlaybackEvent<Label>>) -> Vec<Label> {
    events
        .into_iter()
        .flat_map(PlaybackEvent::into_completions)
        .collect()
}

fn count_sequence_completed(events: &[PlaybackEvent<Label>]) -> usize {
    events.iter().filter(|e| e.is_sequence_completed()).count()
}

/// it should start each auto-play step at the cumulative offset of the previous durations
#[test]
fn auto_play_runs_steps_in_order() {
    let mut scene = RecordingScene::new();
    let (h, seq) = highlight_then_destroy(&mut scene);
    let mut engine = PlaybackEngine::default();
    assert_eq!(engine.planned_offsets(&seq), vec![0.0, 300.0]);

    engine.play_sequence(seq, &mut scene);
    let events = engine.update(0.0, &mut scene);
    assert!(matches!(
        events.as_slice(),
        [
            PlaybackEvent::SequenceStarted { steps: 2, .. },
            PlaybackEvent::StepStarted {
                index: 0,
                kind: StepKind::Highlight,
                ..
            }
        ]
    ));

    // Mid-highlight: still one active step, nothing delivered.
    let events = engine.update(150.0, &mut scene);
    assert!(completions(events).is_empty());
    assert!(scene.object(h).unwrap().highlight.is_some());

    // 310ms: highlight done, destroy started.
    let events = engine.update(160.0, &mut scene);
    assert_eq!(completions(events), vec!["highlight"]);
    assert!(scene.object(h).unwrap().highlight.is_none());
    assert_eq!(engine.active_steps(), 1);

    let events = engine.update(200.0, &mut scene);
    assert_eq!(count_sequence_completed(&events), 1);
    assert_eq!(completions(events), vec!["destroy", "sequence"]);
    assert_eq!(scene.object(h).unwrap().scale, Vec3::ZERO);
    assert_eq!(engine.state(), PlaybackState::Ended);

    // Nothing more is ever delivered.
    let events = engine.update(1000.0, &mut scene);
    assert!(events.is_empty());
}

/// it should deliver every completion even when one frame spans the whole sequence
#[test]
fn one_long_frame_delivers_everything_once() {
    let mut scene = RecordingScene::new();
    let (_, seq) = highlight_then_destroy(&mut scene);
    let mut engine = PlaybackEngine::default();
    engine.play_sequence(seq, &mut scene);
    let events = engine.update(10_000.0, &mut scene);
    assert_eq!(count_sequence_completed(&events), 1);
    assert_eq!(completions(events), vec!["highlight", "destroy", "sequence"]);
}

/// it should scale per-step delay down monotonically as speed goes up
#[test]
fn delay_decreases_with_speed() {
    let mut scene = RecordingScene::new();
    let (_, seq) = highlight_then_destroy(&mut scene);
    let mut engine: PlaybackEngine<Label> = PlaybackEngine::default();

    let mut last = f64::INFINITY;
    for level in 1..=10 {
        engine.set_speed(level);
        let offsets = engine.planned_offsets(&seq);
        let delay = offsets[1];
        assert!(delay < last, "speed {level}: {delay} !< {last}");
        last = delay;
    }
    engine.set_speed(1);
    assert_abs_diff_eq!(engine.step_duration_ms(0.5), 500.0);
    engine.set_speed(10);
    assert_abs_diff_eq!(engine.step_duration_ms(0.5), 50.0);
    assert_eq!(engine.set_speed(0), Speed::new(1));
}

/// it should freeze in-flight interpolation on pause and continue on play
#[test]
fn pause_freezes_and_play_resumes() {
    let mut scene = RecordingScene::new();
    let h = node(&mut scene, 5);
    let mut seq: AnimationSequence<Label> = AnimationSequence::new().with_completion("done");
    seq.push(AnimationStep::move_to(h, Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 1.0));

    let mut engine = PlaybackEngine::default();
    engine.play_sequence(seq, &mut scene);
    engine.update(0.0, &mut scene);
    engine.update(300.0, &mut scene);
    let frozen = scene.object(h).unwrap().position;
    assert!(frozen.x > 0.0 && frozen.x < 10.0);

    engine.pause();
    assert_eq!(engine.state(), PlaybackState::Paused);
    let events = engine.update(5_000.0, &mut scene);
    assert!(events.is_empty());
    assert_eq!(scene.object(h).unwrap().position, frozen);

    engine.play();
    let events = engine.update(400.0, &mut scene);
    assert_eq!(completions(events), vec!["done"]);
    assert_eq!(scene.object(h).unwrap().position, Vec3::new(10.0, 0.0, 0.0));
}

/// it should play exactly one step per operator request in step mode
#[test]
fn step_mode_waits_for_operator() {
    let mut scene = RecordingScene::new();
    let (_, seq) = highlight_then_destroy(&mut scene);
    let mut engine = PlaybackEngine::new(PlaybackConfig {
        step_mode: true,
        ..PlaybackConfig::default()
    });

    engine.play_sequence(seq, &mut scene);
    // A requested step starts on the frame that sees the request.
    engine.update(0.0, &mut scene);
    let events = engine.update(10_000.0, &mut scene);
    assert_eq!(completions(events), vec!["highlight"]);
    assert_eq!(engine.state(), PlaybackState::AwaitingStep);
    assert_eq!(engine.current_step_index(), 1);

    // No request, no progress.
    let events = engine.update(10_000.0, &mut scene);
    assert!(events.is_empty());

    assert!(engine.play_next_step());
    engine.update(0.0, &mut scene);
    let events = engine.update(10_000.0, &mut scene);
    assert_eq!(count_sequence_completed(&events), 1);
    assert_eq!(completions(events), vec!["destroy", "sequence"]);
    assert!(!engine.play_next_step());
}

/// it should refuse a next-step request while the current step is still playing
#[test]
fn step_mode_ignores_request_mid_step() {
    let mut scene = RecordingScene::new();
    let (_, seq) = highlight_then_destroy(&mut scene);
    let mut engine = PlaybackEngine::default();
    engine.set_step_mode(true);
    engine.play_sequence(seq, &mut scene);
    engine.update(10.0, &mut scene);
    assert_eq!(engine.active_steps(), 1);
    assert!(!engine.play_next_step());
}

/// it should hand back undelivered completions when a new sequence supersedes the old one
#[test]
fn new_sequence_supersedes_old() {
    let mut scene = RecordingScene::new();
    let (_, first) = highlight_then_destroy(&mut scene);
    let mut engine = PlaybackEngine::default();
    let g1 = engine.play_sequence(first, &mut scene);
    engine.update(350.0, &mut scene);

    let h2 = node(&mut scene, 2);
    let mut second = AnimationSequence::new().with_completion("second");
    second.push(AnimationStep::create(h2, 0.5));
    let g2 = engine.play_sequence(second, &mut scene);
    assert!(g2 > g1);

    let events = engine.drain_events();
    match &events[0] {
        PlaybackEvent::Superseded {
            generation,
            completions,
        } => {
            assert_eq!(*generation, g1);
            assert_eq!(completions, &vec!["destroy", "sequence"]);
        }
        other => panic!("expected Superseded, got {other:?}"),
    }

    let events = engine.update(10_000.0, &mut scene);
    assert!(events.iter().all(|e| e.generation() == g2));
    assert_eq!(completions(events), vec!["second"]);
}

/// it should keep the planned start times when the speed drops mid-sequence, overlapping steps
#[test]
fn slowing_down_mid_sequence_overlaps_steps() {
    let mut scene = RecordingScene::new();
    let a = node(&mut scene, 1);
    let b = node(&mut scene, 2);
    let mut seq: AnimationSequence<Label> = AnimationSequence::new();
    seq.push(AnimationStep::highlight(a, Color::AMBER, 0.5));
    seq.push(AnimationStep::highlight(b, Color::AMBER, 0.5));
    seq.push(AnimationStep::highlight(a, Color::GREEN, 0.5));

    let mut engine = PlaybackEngine::default();
    engine.set_speed(10); // planned at 0, 50, 100
    engine.play_sequence(seq, &mut scene);
    engine.update(0.0, &mut scene);
    engine.set_speed(1);

    // Step 1 starts on plan but now lasts 500ms.
    engine.update(60.0, &mut scene);
    assert_eq!(engine.current_step_index(), 2);
    assert_eq!(engine.active_steps(), 1);

    // Step 2 still starts at 100ms, while step 1 is playing.
    engine.update(40.0, &mut scene);
    assert_eq!(engine.current_step_index(), 3);
    assert_eq!(engine.active_steps(), 2);
}

/// it should leave the renderer untouched after reset even if frames keep coming
#[test]
fn reset_is_final() {
    let mut scene = RecordingScene::new();
    let (_, seq) = highlight_then_destroy(&mut scene);
    let mut engine = PlaybackEngine::default();
    engine.play_sequence(seq, &mut scene);
    engine.update(50.0, &mut scene);
    engine.pause();
    engine.reset(&mut scene);
    engine.play();
    assert_eq!(engine.state(), PlaybackState::Stopped);

    let before = scene.calls().len();
    let events = engine.update(10_000.0, &mut scene);
    assert_eq!(scene.calls().len(), before);
    assert!(matches!(
        events.as_slice(),
        [PlaybackEvent::Superseded { .. }]
    ));
}

/// it should begin a create step by collapsing the node
#[test]
fn create_step_starts_collapsed() {
    let mut scene = RecordingScene::new();
    let h = node(&mut scene, 3);
    let mut seq: AnimationSequence<Label> = AnimationSequence::new();
    seq.push(AnimationStep::create(h, 0.5));
    let mut engine = PlaybackEngine::default();
    engine.play_sequence(seq, &mut scene);
    scene.clear_calls();
    engine.update(0.0, &mut scene);
    assert_eq!(scene.calls()[0], SceneCall::SetScale { handle: h });
}

fn connector_end(scene: &RecordingScene, handle: VisualHandle) -> Vec3 {
    match &scene.object(handle).unwrap().kind {
        ObjectKind::Connector { to, .. } => *to,
        other => panic!("expected a connector, got {other:?}"),
    }
}

/// it should snap a half-grown node and a half-drawn connector to full size on reset
#[test]
fn reset_snaps_in_flight_steps_to_their_end_state() {
    let mut scene = RecordingScene::new();
    let h = node(&mut scene, 1);
    let to = Vec3::new(4.0, 0.0, 0.0);
    let c = scene.create_connector(Vec3::ZERO, to, Color::CONNECTOR, true);
    let mut seq: AnimationSequence<Label> = AnimationSequence::new();
    seq.push(AnimationStep::create(h, 0.5));
    seq.push(AnimationStep::connect(c, Vec3::ZERO, to, 0.5));

    let mut engine = PlaybackEngine::default();
    engine.play_sequence(seq, &mut scene);
    engine.update(0.0, &mut scene);
    engine.update(100.0, &mut scene);
    let grown = scene.object(h).unwrap().scale.x;
    assert!(grown < 1.0, "create still in flight: {grown}");

    engine.reset(&mut scene);
    assert_eq!(scene.object(h).unwrap().scale, Vec3::ONE);
    // The connect step never started, so it was not touched.
    assert_eq!(connector_end(&scene, c), to);

    let mut seq: AnimationSequence<Label> = AnimationSequence::new();
    seq.push(AnimationStep::connect(c, Vec3::ZERO, to, 0.5));
    engine.play_sequence(seq, &mut scene);
    engine.update(0.0, &mut scene);
    engine.update(100.0, &mut scene);
    assert!(connector_end(&scene, c).x < to.x);

    engine.reset(&mut scene);
    assert_eq!(connector_end(&scene, c), to);
    assert_eq!(engine.active_steps(), 0);
}

/// it should clear a lit highlight and finish a shrink when a new sequence cuts in
#[test]
fn superseding_snaps_in_flight_steps_to_their_end_state() {
    let mut scene = RecordingScene::new();
    let (h, first) = highlight_then_destroy(&mut scene);
    let mut engine = PlaybackEngine::default();
    engine.play_sequence(first, &mut scene);
    engine.update(100.0, &mut scene);
    assert!(scene.object(h).unwrap().highlight.is_some());

    let other = node(&mut scene, 2);
    let mut second: AnimationSequence<Label> = AnimationSequence::new();
    second.push(AnimationStep::highlight(other, Color::GREEN, 0.5));
    engine.play_sequence(second, &mut scene);
    assert!(scene.object(h).unwrap().highlight.is_none());
    // The destroy step had not started; the node keeps its size.
    assert_eq!(scene.object(h).unwrap().scale, Vec3::ONE);

    let (g, third) = highlight_then_destroy(&mut scene);
    engine.play_sequence(third, &mut scene);
    engine.update(0.0, &mut scene);
    engine.update(400.0, &mut scene);
    let shrinking = scene.object(g).unwrap().scale.x;
    assert!(shrinking > 0.0 && shrinking < 1.0, "destroy in flight: {shrinking}");

    engine.play_sequence(AnimationSequence::new(), &mut scene);
    assert_eq!(scene.object(g).unwrap().scale, Vec3::ZERO);
    assert!(scene.object(other).unwrap().highlight.is_none());
}
