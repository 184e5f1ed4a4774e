//! Singly linked list engine. Nodes live in a value-keyed arena and link to
//! their successor by value.

use glam::Vec3;
use hashbrown::HashMap;
use structvista_animation_core::AnimationSequence;
use structvista_scene_core::{SceneRenderer, VisualHandle};

use crate::completion::{Completion, ConnectionKey, Outcome};
use crate::config::StructureConfig;
use crate::factory::StructureKind;
use crate::registry::Registry;
use crate::steps;
use crate::traits::{Sequence, Structure};

#[derive(Debug)]
struct ListNode {
    next: Option<i64>,
    handle: VisualHandle,
    position: Vec3,
}

#[derive(Debug)]
pub struct LinkedList {
    cfg: StructureConfig,
    registry: Registry,
    nodes: HashMap<i64, ListNode>,
    head: Option<i64>,
}

impl Default for LinkedList {
    fn default() -> Self {
        Self::new(StructureConfig::default())
    }
}

impl LinkedList {
    pub fn new(cfg: StructureConfig) -> Self {
        Self {
            cfg,
            registry: Registry::new(),
            nodes: HashMap::new(),
            head: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Values from head to tail.
    pub fn to_vec(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(value) = cursor {
            out.push(value);
            cursor = self.nodes.get(&value).and_then(|n| n.next);
        }
        debug_assert_eq!(out.len(), self.nodes.len(), "list chain is broken");
        out
    }

    /// Position of slot `index` when the list holds `count` nodes.
    fn slot(&self, index: usize, count: usize) -> Vec3 {
        let spacing = self.cfg.node_spacing;
        Vec3::new(
            index as f32 * spacing - count as f32 * spacing / 2.0,
            0.0,
            0.0,
        )
    }

    fn handle_of(&self, value: i64) -> Option<VisualHandle> {
        self.nodes.get(&value).map(|n| n.handle)
    }

    fn position_of(&self, value: i64) -> Vec3 {
        self.nodes.get(&value).map_or(Vec3::ZERO, |n| n.position)
    }

    /// Disconnect step for the `from -> to` link, if it has a connector.
    fn unlink_step(&self, from: i64, to: i64) -> Option<steps::Step> {
        let key = ConnectionKey::new(from, to);
        self.registry
            .connector(key)
            .map(|handle| steps::disconnect(&self.cfg, key, handle))
    }

    /// Move every node to its contiguous slot and refit the connectors.
    fn relayout(&mut self, scene: &mut dyn SceneRenderer) {
        let chain = self.to_vec();
        let count = chain.len();
        for (index, value) in chain.iter().enumerate() {
            let position = self.slot(index, count);
            if let Some(node) = self.nodes.get_mut(value) {
                node.position = position;
                scene.set_position(node.handle, position);
            }
        }
        for pair in chain.windows(2) {
            let key = ConnectionKey::new(pair[0], pair[1]);
            if let Some(connector) = self.registry.connector(key) {
                scene.update_connector_endpoints(
                    connector,
                    self.position_of(pair[0]),
                    self.position_of(pair[1]),
                );
            }
        }
    }
}

impl Structure for LinkedList {
    fn kind(&self) -> StructureKind {
        StructureKind::LinkedList
    }

    fn insert(&mut self, value: i64, scene: &mut dyn SceneRenderer) -> Option<Sequence> {
        if self.has_value(value) {
            log::debug!("list: {} already present", value);
            return None;
        }
        let count = self.nodes.len();
        let position = self.slot(count, count);
        let handle = scene.create_visual_node(value, position, self.cfg.palette.node);

        let mut seq = AnimationSequence::new()
            .with_completion(Completion::finished(Outcome::Inserted { value }));
        seq.push(steps::create(&self.cfg, handle));

        let chain = self.to_vec();
        if let Some((&tail, walked)) = chain.split_last() {
            for v in walked {
                if let Some(h) = self.handle_of(*v) {
                    seq.push(steps::visit(&self.cfg, h));
                }
            }
            let tail_position = self.position_of(tail);
            if let Some(h) = self.handle_of(tail) {
                seq.push(steps::mark(&self.cfg, h));
            }
            let connector =
                scene.create_connector(tail_position, position, self.cfg.palette.connector, true);
            self.registry
                .insert_connector(ConnectionKey::new(tail, value), connector);
            seq.push(steps::connect(&self.cfg, connector, tail_position, position));
            if let Some(node) = self.nodes.get_mut(&tail) {
                node.next = Some(value);
            }
        } else {
            self.head = Some(value);
        }

        self.nodes.insert(
            value,
            ListNode {
                next: None,
                handle,
                position,
            },
        );
        self.registry.insert_node(value, handle);
        log::debug!("list: insert {} ({} nodes)", value, self.nodes.len());
        Some(seq)
    }

    fn delete(&mut self, value: i64, scene: &mut dyn SceneRenderer) -> Option<Sequence> {
        if !self.has_value(value) {
            log::debug!("list: {} not present", value);
            return None;
        }
        let chain = self.to_vec();
        let index = chain.iter().position(|v| *v == value)?;
        let successor = chain.get(index + 1).copied();
        let handle = self.handle_of(value)?;

        let mut seq = AnimationSequence::new()
            .with_completion(Completion::finished_with_relayout(Outcome::Deleted { value }));

        if index == 0 {
            seq.push(steps::doomed(&self.cfg, handle));
            if let Some(next) = successor {
                seq.extend(self.unlink_step(value, next));
            }
            self.head = successor;
        } else {
            for v in &chain[..index] {
                if let Some(h) = self.handle_of(*v) {
                    seq.push(steps::visit(&self.cfg, h));
                }
            }
            seq.push(steps::doomed(&self.cfg, handle));

            let pred = chain[index - 1];
            seq.extend(self.unlink_step(pred, value));
            if let Some(next) = successor {
                seq.extend(self.unlink_step(value, next));
                let from = self.position_of(pred);
                let to = self.position_of(next);
                let connector = scene.create_connector(from, to, self.cfg.palette.connector, true);
                self.registry
                    .insert_connector(ConnectionKey::new(pred, next), connector);
                seq.push(steps::connect(&self.cfg, connector, from, to));
            }
            if let Some(node) = self.nodes.get_mut(&pred) {
                node.next = successor;
            }
        }

        seq.push(steps::destroy(&self.cfg, value, handle));
        self.nodes.remove(&value);
        log::debug!("list: delete {} ({} nodes left)", value, self.nodes.len());
        Some(seq)
    }

    fn search(&self, value: i64) -> Sequence {
        let mut seq = AnimationSequence::new();
        let mut found = false;
        for v in self.to_vec() {
            let Some(h) = self.handle_of(v) else { continue };
            if v == value {
                seq.push(steps::found(&self.cfg, h));
                found = true;
                break;
            }
            seq.push(steps::visit(&self.cfg, h));
        }
        seq.with_completion(Completion::finished(Outcome::Searched { value, found }))
    }

    fn clear(&mut self, scene: &mut dyn SceneRenderer) {
        self.registry.clear(scene);
        self.nodes.clear();
        self.head = None;
    }

    fn complete(
        &mut self,
        completion: Completion,
        scene: &mut dyn SceneRenderer,
    ) -> Option<Outcome> {
        let (outcome, relayout) = self.registry.settle(scene, completion)?;
        if relayout {
            self.relayout(scene);
        }
        log::info!("list: {}", outcome);
        Some(outcome)
    }

    fn has_value(&self, value: i64) -> bool {
        self.nodes.contains_key(&value)
    }

    fn values(&self) -> Vec<i64> {
        self.to_vec()
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }
}
