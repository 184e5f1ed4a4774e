//! Playback engine: turns an [`AnimationSequence`] into timed renderer calls.
//!
//! Time only moves inside [`PlaybackEngine::update`]. Two pacing modes:
//! - auto-play: step `i` starts at the sum of the scaled durations of steps
//!   `0..i`, planned once when the sequence (or auto-play) starts. A step's
//!   own duration is fixed when it starts, so slowing down mid-sequence makes
//!   later steps overlap the one still playing.
//! - step mode: one step at a time; after it finishes the engine waits in
//!   [`PlaybackState::AwaitingStep`] until [`PlaybackEngine::play_next_step`].
//!
//! Every sequence and every reset gets a new [`Generation`]. Steps still
//! playing when their sequence is cut short jump to their end state once, then
//! are dropped; their completions are handed back in a single `Superseded`
//! event instead.

use structvista_scene_core::SceneRenderer;

use crate::config::{PlaybackConfig, Speed};
use crate::effects;
use crate::events::PlaybackEvent;
use crate::ids::{Generation, GenerationCounter};
use crate::state::PlaybackState;
use crate::step::AnimationSequence;
use crate::step::AnimationStep;

#[derive(Debug, Clone, Copy)]
struct ActiveStep {
    index: usize,
    generation: Generation,
    started_at_ms: f64,
    duration_ms: f64,
}

impl ActiveStep {
    fn progress(&self, clock_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((clock_ms - self.started_at_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    fn ends_at(&self) -> f64 {
        self.started_at_ms + self.duration_ms
    }
}

#[derive(Debug)]
struct LoadedSequence<C> {
    generation: Generation,
    steps: Vec<AnimationStep<C>>,
    on_complete: Option<C>,
    completed: usize,
}

impl<C> LoadedSequence<C> {
    fn into_pending_completions(self) -> Vec<C> {
        self.steps
            .into_iter()
            .filter_map(|s| s.on_complete)
            .chain(self.on_complete)
            .collect()
    }
}

#[derive(Debug)]
pub struct PlaybackEngine<C> {
    cfg: PlaybackConfig,
    speed: Speed,
    step_mode: bool,
    state: PlaybackState,
    generations: GenerationCounter,
    current: Option<LoadedSequence<C>>,
    /// Next step that has not started yet.
    cursor: usize,
    clock_ms: f64,
    /// Auto-play: planned clock time at which each step starts.
    schedule: Vec<f64>,
    /// Step mode: the operator asked for the next step.
    step_requested: bool,
    active: Vec<ActiveStep>,
    events: Vec<PlaybackEvent<C>>,
}

impl<C> Default for PlaybackEngine<C> {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl<C> PlaybackEngine<C> {
    pub fn new(cfg: PlaybackConfig) -> Self {
        Self {
            speed: cfg.speed,
            step_mode: cfg.step_mode,
            cfg,
            state: PlaybackState::Stopped,
            generations: GenerationCounter::new(),
            current: None,
            cursor: 0,
            clock_ms: 0.0,
            schedule: Vec::new(),
            step_requested: false,
            active: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.cfg
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn speed(&self) -> Speed {
        self.speed
    }

    #[inline]
    pub fn is_step_mode(&self) -> bool {
        self.step_mode
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generations.current()
    }

    /// Index of the next step that has not started.
    #[inline]
    pub fn current_step_index(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// True while a sequence is loaded and has not delivered its completion.
    #[inline]
    pub fn has_sequence(&self) -> bool {
        self.current.is_some()
    }

    /// Number of steps currently interpolating.
    #[inline]
    pub fn active_steps(&self) -> usize {
        self.active.len()
    }

    /// Clamp and apply a speed level. Affects steps that have not started yet.
    pub fn set_speed(&mut self, level: i64) -> Speed {
        self.speed = Speed::new(level);
        self.speed
    }

    /// Wall-clock length of a step of logical `duration` at the current speed.
    #[inline]
    pub fn step_duration_ms(&self, duration: f32) -> f64 {
        self.cfg.scaled_ms(duration, self.speed)
    }

    /// Auto-play start offsets (ms from sequence start) for each step of
    /// `sequence` at the current speed.
    pub fn planned_offsets(&self, sequence: &AnimationSequence<C>) -> Vec<f64> {
        let mut at = 0.0;
        sequence
            .steps
            .iter()
            .map(|step| {
                let start = at;
                at += self.step_duration_ms(step.duration);
                start
            })
            .collect()
    }

    /// Load and start a sequence, superseding any sequence still in flight.
    pub fn play_sequence(
        &mut self,
        sequence: AnimationSequence<C>,
        scene: &mut dyn SceneRenderer,
    ) -> Generation {
        self.supersede(scene);
        let generation = self.generations.advance();
        let steps = sequence.steps.len();
        log::debug!("playback: sequence {:?} with {} steps", generation, steps);

        self.current = Some(LoadedSequence {
            generation,
            steps: sequence.steps,
            on_complete: sequence.on_complete,
            completed: 0,
        });
        self.cursor = 0;
        self.plan_from(self.clock_ms);
        self.step_requested = self.step_mode;
        self.state = PlaybackState::Playing;
        self.events
            .push(PlaybackEvent::SequenceStarted { generation, steps });

        if steps == 0 {
            self.finish_if_done();
        }
        generation
    }

    /// Step mode: ask for the next step. Returns false when there is nothing to
    /// advance to or a step is still playing.
    pub fn play_next_step(&mut self) -> bool {
        let remaining = self
            .current
            .as_ref()
            .is_some_and(|seq| self.cursor < seq.steps.len());
        if !self.step_mode || !remaining || !self.active.is_empty() {
            return false;
        }
        self.step_requested = true;
        self.state = PlaybackState::Playing;
        true
    }

    /// Switch pacing. Leaving step mode schedules the remaining steps from the
    /// end of whatever is still playing.
    pub fn set_step_mode(&mut self, step_mode: bool) {
        if self.step_mode == step_mode {
            return;
        }
        self.step_mode = step_mode;
        self.step_requested = false;
        if !step_mode {
            let base = self
                .active
                .iter()
                .map(ActiveStep::ends_at)
                .fold(self.clock_ms, f64::max);
            self.plan_from(base);
            if self.state == PlaybackState::AwaitingStep {
                self.state = PlaybackState::Playing;
            }
        } else if self.current.is_some() && self.active.is_empty() && self.state.is_playing() {
            self.state = PlaybackState::AwaitingStep;
        }
    }

    /// Resume after pause. In step mode with nothing playing this also asks
    /// for the next step.
    pub fn play(&mut self) {
        if self.current.is_none() {
            return;
        }
        if self.step_mode && self.active.is_empty() {
            self.step_requested = true;
        }
        self.state = PlaybackState::Playing;
    }

    /// Freeze the clock. In-flight steps keep their current interpolated values.
    pub fn pause(&mut self) {
        if self.state.can_pause() {
            self.state = PlaybackState::Paused;
        }
    }

    /// Cut the sequence in flight short, keeping speed, mode and play state.
    /// Steps already playing jump to their end state; undelivered completions
    /// are queued in a `Superseded` event.
    pub fn interrupt(&mut self, scene: &mut dyn SceneRenderer) {
        self.supersede(scene);
        self.cursor = 0;
        self.schedule.clear();
        self.step_requested = false;
    }

    /// Drop the current sequence, step index and play/pause state. Steps
    /// already playing jump to their end state.
    pub fn reset(&mut self, scene: &mut dyn SceneRenderer) {
        self.supersede(scene);
        self.generations.advance();
        self.cursor = 0;
        self.schedule.clear();
        self.step_requested = false;
        self.state = PlaybackState::Stopped;
    }

    /// Advance the clock by `dt_ms` and apply due visual effects. Returns every
    /// event produced since the last drain, in order.
    pub fn update(&mut self, dt_ms: f64, scene: &mut dyn SceneRenderer) -> Vec<PlaybackEvent<C>> {
        let generation = self.generations.current();
        self.active.retain(|a| a.generation == generation);

        if self.state.is_playing() && self.current.is_some() {
            self.clock_ms += dt_ms.max(0.0);
            self.start_due_steps(scene);
            self.sample_active(scene);
            self.finish_if_done();
        }
        self.drain_events()
    }

    pub fn drain_events(&mut self) -> Vec<PlaybackEvent<C>> {
        std::mem::take(&mut self.events)
    }

    fn start_due_steps(&mut self, scene: &mut dyn SceneRenderer) {
        let len = match &self.current {
            Some(seq) => seq.steps.len(),
            None => return,
        };
        if self.step_mode {
            if self.step_requested && self.active.is_empty() && self.cursor < len {
                self.step_requested = false;
                let start = self.clock_ms;
                self.start_step(self.cursor, start, scene);
                self.cursor += 1;
            }
            return;
        }
        while self.cursor < len {
            let start = self.schedule.get(self.cursor).copied().unwrap_or(self.clock_ms);
            if self.clock_ms < start {
                break;
            }
            self.start_step(self.cursor, start, scene);
            self.cursor += 1;
        }
    }

    /// Plan auto-play start times for the steps from `cursor` on, the first
    /// one starting at `base`.
    fn plan_from(&mut self, base: f64) {
        let Some(seq) = self.current.as_ref() else {
            self.schedule.clear();
            return;
        };
        let mut schedule = vec![base; seq.steps.len()];
        let mut at = base;
        for (index, step) in seq.steps.iter().enumerate().skip(self.cursor) {
            schedule[index] = at;
            at += self.cfg.scaled_ms(step.duration, self.speed);
        }
        self.schedule = schedule;
    }

    fn start_step(&mut self, index: usize, started_at_ms: f64, scene: &mut dyn SceneRenderer) {
        let Some(seq) = self.current.as_ref() else {
            return;
        };
        let step = &seq.steps[index];
        let generation = seq.generation;
        let kind = step.kind();
        let duration_ms = self.cfg.scaled_ms(step.duration, self.speed);
        effects::begin(step.target, &step.params, scene);

        self.active.push(ActiveStep {
            index,
            generation,
            started_at_ms,
            duration_ms,
        });
        self.events.push(PlaybackEvent::StepStarted {
            generation,
            index,
            kind,
        });
    }

    fn sample_active(&mut self, scene: &mut dyn SceneRenderer) {
        let Some(seq) = self.current.as_ref() else {
            return;
        };
        let mut finished = Vec::new();
        for active in &self.active {
            let step = &seq.steps[active.index];
            let progress = active.progress(self.clock_ms);
            if progress >= 1.0 {
                effects::finish(step.target, &step.params, scene);
                finished.push(active.index);
            } else {
                effects::sample(step.target, &step.params, progress, scene);
            }
        }
        if finished.is_empty() {
            return;
        }
        self.active.retain(|a| !finished.contains(&a.index));
        finished.sort_unstable();
        for index in finished {
            self.complete_step(index);
        }
        let len = self.current.as_ref().map_or(0, |seq| seq.steps.len());
        if self.step_mode && self.active.is_empty() && self.cursor < len {
            self.state = PlaybackState::AwaitingStep;
        }
    }

    fn complete_step(&mut self, index: usize) {
        let Some(seq) = self.current.as_mut() else {
            return;
        };
        seq.completed += 1;
        let completion = seq.steps[index].on_complete.take();
        self.events.push(PlaybackEvent::StepCompleted {
            generation: seq.generation,
            index,
            completion,
        });
    }

    fn finish_if_done(&mut self) {
        let done = self
            .current
            .as_ref()
            .is_some_and(|seq| seq.completed >= seq.steps.len());
        if !done {
            return;
        }
        if let Some(seq) = self.current.take() {
            log::debug!("playback: sequence {:?} complete", seq.generation);
            self.events.push(PlaybackEvent::SequenceCompleted {
                generation: seq.generation,
                completion: seq.on_complete,
            });
        }
        self.active.clear();
        self.state = PlaybackState::Ended;
    }

    /// Cut the current sequence short: snap its playing steps to their end
    /// state and hand back its undelivered completions.
    fn supersede(&mut self, scene: &mut dyn SceneRenderer) {
        if let Some(seq) = self.current.as_ref() {
            for active in self.active.iter().filter(|a| a.generation == seq.generation) {
                let step = &seq.steps[active.index];
                effects::finish(step.target, &step.params, scene);
            }
        }
        self.active.clear();
        if let Some(seq) = self.current.take() {
            let generation = seq.generation;
            let completions = seq.into_pending_completions();
            log::debug!(
                "playback: sequence {:?} superseded with {} pending completions",
                generation,
                completions.len()
            );
            self.events.push(PlaybackEvent::Superseded {
                generation,
                completions,
            });
        }
    }
}
