use std::fmt::Debug;

use structvista_animation_core::AnimationSequence;
use structvista_scene_core::SceneRenderer;

use crate::completion::{Completion, Outcome};
use crate::factory::StructureKind;
use crate::registry::Registry;

pub type Sequence = AnimationSequence<Completion>;

/// Operations every structure engine supports.
///
/// Mutations update the logical model before returning; the returned sequence
/// only describes what to show. Visuals created by an operation are created
/// immediately (and registered), visuals removed by it stay addressable until
/// the matching release completion is passed to [`Structure::complete`].
pub trait Structure: Debug {
    fn kind(&self) -> StructureKind;

    /// `None` when `value` is already present.
    fn insert(&mut self, value: i64, scene: &mut dyn SceneRenderer) -> Option<Sequence>;

    /// `None` when `value` is absent.
    ///
    /// The value leaves the model before this returns, so `has_value` and
    /// `values` no longer see it. Its node and connectors stay on screen and in
    /// the registry until the release completions of the returned sequence
    /// reach [`Structure::complete`], or until that sequence is superseded.
    fn delete(&mut self, value: i64, scene: &mut dyn SceneRenderer) -> Option<Sequence>;

    /// Never mutates. Found or not is reported by the sequence's `Finished`
    /// completion.
    fn search(&self, value: i64) -> Sequence;

    /// Drop all logical and visual state at once, without animation.
    fn clear(&mut self, scene: &mut dyn SceneRenderer);

    /// Apply a completion fired by the playback engine. Returns the outcome
    /// when `completion` is the sequence-level one.
    fn complete(&mut self, completion: Completion, scene: &mut dyn SceneRenderer)
        -> Option<Outcome>;

    fn has_value(&self, value: i64) -> bool;

    /// Values in the structure's natural order (chain, in-order, insertion).
    fn values(&self) -> Vec<i64>;

    fn registry(&self) -> &Registry;

    /// Registered node visuals.
    fn node_count(&self) -> usize {
        self.registry().node_count()
    }

    /// Registered connector visuals.
    fn connector_count(&self) -> usize {
        self.registry().connector_count()
    }

    fn as_edge_mutable(&mut self) -> Option<&mut dyn EdgeMutable> {
        None
    }

    fn as_path_findable(&mut self) -> Option<&mut dyn PathFindable> {
        None
    }
}

/// Structures whose edges can be added and removed directly.
pub trait EdgeMutable {
    /// `None` when an endpoint is absent or the edge already exists.
    fn add_edge(&mut self, from: i64, to: i64, scene: &mut dyn SceneRenderer)
        -> Option<Sequence>;

    /// `None` when the edge is absent.
    fn remove_edge(&mut self, from: i64, to: i64, scene: &mut dyn SceneRenderer)
        -> Option<Sequence>;
}

/// Structures that can animate a shortest-path search.
pub trait PathFindable {
    /// `None` when either endpoint is absent.
    fn find_shortest_path(&self, start: i64, end: i64) -> Option<Sequence>;
}
