//! The app: one scene, at most one selected structure, one playback engine.
//!
//! Structure commands first interrupt whatever sequence is still playing and
//! apply its undelivered completions, so a new operation always starts from a
//! settled registry. Playback commands never touch the structure.

use serde::{Deserialize, Serialize};
use structvista_animation_core::{PlaybackEngine, PlaybackEvent, PlaybackState};
use structvista_scene_core::SceneRenderer;
use structvista_structures_core::{create, Completion, Outcome, Sequence, Structure, StructureKind};

use crate::command::{Command, Status};
use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum AppEvent {
    /// An operation's sequence finished, or was cut short and settled.
    OperationFinished { outcome: Outcome },
}

/// Serializable view of the app for hosts and tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub structure: Option<StructureKind>,
    pub values: Vec<i64>,
    pub nodes: usize,
    pub connectors: usize,
    pub playback: PlaybackState,
    pub speed: u8,
    pub step_mode: bool,
}

#[derive(Debug)]
pub struct StructVistaApp<R: SceneRenderer> {
    cfg: AppConfig,
    scene: R,
    structure: Option<Box<dyn Structure>>,
    playback: PlaybackEngine<Completion>,
    events: Vec<AppEvent>,
}

impl<R: SceneRenderer + Default> Default for StructVistaApp<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: SceneRenderer> StructVistaApp<R> {
    pub fn new(scene: R) -> Self {
        Self::with_config(AppConfig::default(), scene)
    }

    pub fn with_config(cfg: AppConfig, scene: R) -> Self {
        Self {
            playback: PlaybackEngine::new(cfg.playback.clone()),
            cfg,
            scene,
            structure: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn scene(&self) -> &R {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut R {
        &mut self.scene
    }

    pub fn structure(&self) -> Option<&dyn Structure> {
        self.structure.as_deref()
    }

    pub fn playback(&self) -> &PlaybackEngine<Completion> {
        &self.playback
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let structure = self.structure.as_deref();
        AppSnapshot {
            structure: structure.map(|s| s.kind()),
            values: structure.map(|s| s.values()).unwrap_or_default(),
            nodes: structure.map_or(0, |s| s.node_count()),
            connectors: structure.map_or(0, |s| s.connector_count()),
            playback: self.playback.state(),
            speed: self.playback.speed().level(),
            step_mode: self.playback.is_step_mode(),
        }
    }

    /// Like [`Self::dispatch`], reporting errors as an error-level status.
    pub fn handle(&mut self, cmd: Command) -> Status {
        let name = cmd.name();
        match self.dispatch(cmd) {
            Ok(status) => status,
            Err(err) => {
                log::warn!("app: {} rejected: {}", name, err);
                Status::from(&err)
            }
        }
    }

    /// Apply one command. Rejections that are part of normal use (duplicate
    /// value, missing edge) come back as warning statuses, not errors.
    pub fn dispatch(&mut self, cmd: Command) -> Result<Status, AppError> {
        log::debug!("app: {:?}", cmd);
        if cmd.targets_structure() {
            if self.structure.is_none() {
                return Err(AppError::NoStructure);
            }
            self.flush();
        }

        let status = match cmd {
            Command::SelectStructure { kind } => self.select(kind),
            Command::Insert { value } => {
                let structure = self.structure.as_mut().ok_or(AppError::NoStructure)?;
                let seq = structure.insert(value, &mut self.scene);
                self.start(seq, format!("inserting value {value}..."), || {
                    format!("value {value} already exists")
                })
            }
            Command::Delete { value } => {
                let structure = self.structure.as_mut().ok_or(AppError::NoStructure)?;
                let seq = structure.delete(value, &mut self.scene);
                self.start(seq, format!("deleting value {value}..."), || {
                    format!("value {value} does not exist")
                })
            }
            Command::Search { value } => {
                let structure = self.structure.as_mut().ok_or(AppError::NoStructure)?;
                let seq = structure.search(value);
                self.start(Some(seq), format!("searching {value}..."), String::new)
            }
            Command::Clear => {
                if let Some(s) = self.structure.as_mut() {
                    s.clear(&mut self.scene);
                }
                self.playback.reset(&mut self.scene);
                self.route_pending();
                Status::info("structure cleared")
            }
            Command::AddEdge { from, to } => {
                let structure = self.structure.as_mut().ok_or(AppError::NoStructure)?;
                let kind = structure.kind();
                let edges = structure.as_edge_mutable().ok_or(AppError::Unsupported {
                    kind,
                    capability: "adding edges",
                })?;
                let seq = edges.add_edge(from, to, &mut self.scene);
                self.start(seq, format!("adding edge {from} -> {to}..."), || {
                    format!("cannot add edge {from} -> {to}")
                })
            }
            Command::RemoveEdge { from, to } => {
                let structure = self.structure.as_mut().ok_or(AppError::NoStructure)?;
                let kind = structure.kind();
                let edges = structure.as_edge_mutable().ok_or(AppError::Unsupported {
                    kind,
                    capability: "removing edges",
                })?;
                let seq = edges.remove_edge(from, to, &mut self.scene);
                self.start(seq, format!("removing edge {from} -> {to}..."), || {
                    format!("cannot remove edge {from} -> {to}")
                })
            }
            Command::ShortestPath { start, end } => {
                let structure = self.structure.as_mut().ok_or(AppError::NoStructure)?;
                let kind = structure.kind();
                let paths = structure.as_path_findable().ok_or(AppError::Unsupported {
                    kind,
                    capability: "shortest path",
                })?;
                let seq = paths.find_shortest_path(start, end);
                self.start(seq, format!("finding path {start} -> {end}..."), || {
                    format!("cannot find path from {start} to {end}")
                })
            }
            Command::SetStepMode { enabled } => {
                self.playback.set_step_mode(enabled);
                Status::info(if enabled {
                    "step mode on"
                } else {
                    "step mode off"
                })
            }
            Command::Play => {
                self.playback.play();
                Status::info("playing")
            }
            Command::NextStep => {
                if self.playback.play_next_step() {
                    Status::info("next step")
                } else {
                    Status::warning("no step to play")
                }
            }
            Command::Pause => {
                self.playback.pause();
                Status::info("paused")
            }
            Command::Reset => {
                self.playback.reset(&mut self.scene);
                self.route_pending();
                Status::info("playback reset")
            }
            Command::SetSpeed { level } => {
                let speed = self.playback.set_speed(level);
                Status::info(format!("speed {}", speed.level()))
            }
        };
        Ok(status)
    }

    /// Advance time by `dt_ms` and return the operations that finished.
    pub fn tick(&mut self, dt_ms: f64) -> Vec<AppEvent> {
        self.advance(dt_ms);
        self.drain_events()
    }

    /// Tick in `frame_ms` steps until nothing is playing. Stops early when the
    /// engine pauses or waits for the next step.
    pub fn run_until_idle(&mut self) -> Vec<AppEvent> {
        let mut frames = 0;
        while self.playback.has_sequence()
            && self.playback.state().is_playing()
            && frames < self.cfg.max_idle_frames
        {
            self.advance(self.cfg.frame_ms);
            frames += 1;
        }
        if frames == self.cfg.max_idle_frames {
            log::warn!("app: still playing after {} frames", frames);
        }
        self.route_pending();
        self.drain_events()
    }

    pub fn drain_events(&mut self) -> Vec<AppEvent> {
        std::mem::take(&mut self.events)
    }

    fn select(&mut self, kind: StructureKind) -> Status {
        self.flush();
        if let Some(mut old) = self.structure.take() {
            old.clear(&mut self.scene);
        }
        self.playback.reset(&mut self.scene);
        self.route_pending();
        self.structure = Some(create(kind, &self.cfg.structures));
        log::info!("app: selected {}", kind);
        Status::info(format!("selected {kind}"))
    }

    fn start(
        &mut self,
        seq: Option<Sequence>,
        started: String,
        rejected: impl FnOnce() -> String,
    ) -> Status {
        match seq {
            Some(seq) => {
                self.playback.play_sequence(seq, &mut self.scene);
                Status::info(started)
            }
            None => Status::warning(rejected()),
        }
    }

    /// Cut the running sequence short and settle its completions.
    fn flush(&mut self) {
        self.playback.interrupt(&mut self.scene);
        self.route_pending();
    }

    fn advance(&mut self, dt_ms: f64) {
        let events = self.playback.update(dt_ms, &mut self.scene);
        self.route(events);
    }

    fn route_pending(&mut self) {
        let events = self.playback.drain_events();
        self.route(events);
    }

    fn route(&mut self, events: Vec<PlaybackEvent<Completion>>) {
        let Some(structure) = self.structure.as_mut() else {
            return;
        };
        for completion in events.into_iter().flat_map(PlaybackEvent::into_completions) {
            if let Some(outcome) = structure.complete(completion, &mut self.scene) {
                log::debug!("app: finished {}", outcome);
                self.events.push(AppEvent::OperationFinished { outcome });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structvista_scene_core::RecordingScene;

    fn app_with(kind: StructureKind) -> StructVistaApp<RecordingScene> {
        let mut app = StructVistaApp::<RecordingScene>::default();
        app.dispatch(Command::SelectStructure { kind }).unwrap();
        app
    }

    #[test]
    fn structure_commands_need_a_selection() {
        let mut app = StructVistaApp::<RecordingScene>::default();
        let err = app.dispatch(Command::Insert { value: 1 }).unwrap_err();
        assert!(matches!(err, AppError::NoStructure));
        let status = app.handle(Command::Clear);
        assert_eq!(status, Status::error("select a data structure first"));

        // Playback commands are fine without one.
        assert!(app.dispatch(Command::SetSpeed { level: 3 }).is_ok());
    }

    #[test]
    fn duplicate_and_missing_values_are_warnings() {
        let mut app = app_with(StructureKind::LinkedList);
        assert!(app.handle(Command::Insert { value: 4 }).is_info());
        app.run_until_idle();

        let status = app.handle(Command::Insert { value: 4 });
        assert_eq!(status, Status::warning("value 4 already exists"));
        let status = app.handle(Command::Delete { value: 9 });
        assert_eq!(status, Status::warning("value 9 does not exist"));
    }

    #[test]
    fn edge_commands_need_a_graph() {
        let mut app = app_with(StructureKind::BinaryTree);
        let err = app
            .dispatch(Command::ShortestPath { start: 1, end: 2 })
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Unsupported {
                kind: StructureKind::BinaryTree,
                ..
            }
        ));
        assert!(app
            .handle(Command::AddEdge { from: 1, to: 2 })
            .message
            .contains("does not support adding edges"));
    }

    #[test]
    fn new_command_settles_the_previous_sequence() {
        let mut app = app_with(StructureKind::LinkedList);
        app.handle(Command::Insert { value: 1 });
        app.tick(10.0);
        app.handle(Command::Insert { value: 2 });

        // The first insert was cut short but still reported.
        let events = app.drain_events();
        assert_eq!(
            events,
            vec![AppEvent::OperationFinished {
                outcome: Outcome::Inserted { value: 1 }
            }]
        );
        let events = app.run_until_idle();
        assert_eq!(
            events,
            vec![AppEvent::OperationFinished {
                outcome: Outcome::Inserted { value: 2 }
            }]
        );
        let snap = app.snapshot();
        assert_eq!(snap.values, vec![1, 2]);
        assert_eq!((snap.nodes, snap.connectors), (2, 1));
    }

    #[test]
    fn selecting_again_clears_the_scene() {
        let mut app = app_with(StructureKind::BinaryTree);
        for v in [2, 1, 3] {
            app.handle(Command::Insert { value: v });
        }
        app.run_until_idle();
        assert_eq!(app.scene().node_count(), 3);

        app.handle(Command::SelectStructure {
            kind: StructureKind::Graph,
        });
        assert!(app.scene().is_empty());
        assert_eq!(app.snapshot().structure, Some(StructureKind::Graph));
        assert!(app.snapshot().values.is_empty());
    }
}
