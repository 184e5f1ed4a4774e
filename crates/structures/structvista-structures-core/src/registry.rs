//! Value -> node handle and key -> connector handle maps shared by every engine.
//!
//! An entry exists iff the logical entity does, once all fired completions have
//! been applied. Releases carry the handle they were issued for, so a release
//! that arrives after the key was re-used only removes the old visual.

use indexmap::IndexMap;
use structvista_scene_core::{SceneRenderer, VisualHandle};

use crate::completion::{Completion, ConnectionKey, Outcome};

#[derive(Debug, Default)]
pub struct Registry {
    nodes: IndexMap<i64, VisualHandle>,
    connectors: IndexMap<ConnectionKey, VisualHandle>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn node(&self, value: i64) -> Option<VisualHandle> {
        self.nodes.get(&value).copied()
    }

    #[inline]
    pub fn connector(&self, key: ConnectionKey) -> Option<VisualHandle> {
        self.connectors.get(&key).copied()
    }

    #[inline]
    pub fn contains_node(&self, value: i64) -> bool {
        self.nodes.contains_key(&value)
    }

    #[inline]
    pub fn contains_connector(&self, key: ConnectionKey) -> bool {
        self.connectors.contains_key(&key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    pub fn node_values(&self) -> impl Iterator<Item = i64> + '_ {
        self.nodes.keys().copied()
    }

    pub fn connector_keys(&self) -> impl Iterator<Item = ConnectionKey> + '_ {
        self.connectors.keys().copied()
    }

    pub fn insert_node(&mut self, value: i64, handle: VisualHandle) {
        if let Some(old) = self.nodes.insert(value, handle) {
            log::debug!("registry: node {} now {:?} (was {:?})", value, handle, old);
        }
    }

    pub fn insert_connector(&mut self, key: ConnectionKey, handle: VisualHandle) {
        if let Some(old) = self.connectors.insert(key, handle) {
            log::debug!("registry: connector {} now {:?} (was {:?})", key, handle, old);
        }
    }

    /// Remove `handle` from the scene and drop the node entry that still
    /// points at it. Returns whether an entry was dropped.
    pub fn release_node(
        &mut self,
        scene: &mut dyn SceneRenderer,
        value: i64,
        handle: VisualHandle,
    ) -> bool {
        scene.remove_visual_object(handle);
        if self.nodes.get(&value) == Some(&handle) {
            self.nodes.shift_remove(&value);
            return true;
        }
        let before = self.nodes.len();
        self.nodes.retain(|_, h| *h != handle);
        before != self.nodes.len()
    }

    /// Connector counterpart of [`Registry::release_node`].
    pub fn release_connector(
        &mut self,
        scene: &mut dyn SceneRenderer,
        key: ConnectionKey,
        handle: VisualHandle,
    ) -> bool {
        scene.remove_visual_object(handle);
        if self.connectors.get(&key) == Some(&handle) {
            self.connectors.shift_remove(&key);
            return true;
        }
        let before = self.connectors.len();
        self.connectors.retain(|_, h| *h != handle);
        before != self.connectors.len()
    }

    /// Apply a release completion. A `Finished` completion is handed back as
    /// `(outcome, relayout)` for the engine to act on.
    pub fn settle(
        &mut self,
        scene: &mut dyn SceneRenderer,
        completion: Completion,
    ) -> Option<(Outcome, bool)> {
        match completion {
            Completion::ReleaseNode { value, handle } => {
                self.release_node(scene, value, handle);
                None
            }
            Completion::ReleaseConnector { key, handle } => {
                self.release_connector(scene, key, handle);
                None
            }
            Completion::Finished { outcome, relayout } => Some((outcome, relayout)),
        }
    }

    /// Swap in maps rebuilt from the owning logical nodes.
    pub fn rebuild(
        &mut self,
        nodes: IndexMap<i64, VisualHandle>,
        connectors: IndexMap<ConnectionKey, VisualHandle>,
    ) {
        self.nodes = nodes;
        self.connectors = connectors;
    }

    /// Remove every registered visual from the scene and forget them.
    pub fn clear(&mut self, scene: &mut dyn SceneRenderer) {
        for (_, handle) in self.connectors.drain(..) {
            scene.remove_visual_object(handle);
        }
        for (_, handle) in self.nodes.drain(..) {
            scene.remove_visual_object(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structvista_scene_core::{Color, RecordingScene, Vec3};

    #[test]
    fn stale_release_keeps_newer_entry() {
        let mut scene = RecordingScene::new();
        let mut registry = Registry::new();
        let old = scene.create_visual_node(5, Vec3::ZERO, Color::NODE);
        let new = scene.create_visual_node(5, Vec3::X, Color::NODE);
        registry.insert_node(5, new);

        assert!(!registry.release_node(&mut scene, 5, old));
        assert_eq!(registry.node(5), Some(new));
        assert!(!scene.contains(old));
        assert!(scene.contains(new));
    }

    #[test]
    fn release_falls_back_to_handle_lookup() {
        let mut scene = RecordingScene::new();
        let mut registry = Registry::new();
        let c = scene.create_connector(Vec3::ZERO, Vec3::X, Color::CONNECTOR, false);
        registry.insert_connector(ConnectionKey::new(30, 40), c);

        assert!(registry.release_connector(&mut scene, ConnectionKey::new(40, 40), c));
        assert_eq!(registry.connector_count(), 0);
    }

    #[test]
    fn clear_removes_everything_from_scene() {
        let mut scene = RecordingScene::new();
        let mut registry = Registry::new();
        let a = scene.create_visual_node(1, Vec3::ZERO, Color::NODE);
        let b = scene.create_visual_node(2, Vec3::X, Color::NODE);
        let c = scene.create_connector(Vec3::ZERO, Vec3::X, Color::CONNECTOR, true);
        registry.insert_node(1, a);
        registry.insert_node(2, b);
        registry.insert_connector(ConnectionKey::new(1, 2), c);

        registry.clear(&mut scene);
        assert!(scene.is_empty());
        assert_eq!(registry.node_count(), 0);
        registry.clear(&mut scene);
        assert_eq!(scene.stale_calls(), 0);
    }
}
