//! Directed graph engine: circular layout, BFS search and unit-weight
//! Dijkstra shortest paths.
//!
//! Node order is insertion order and drives layout, the BFS start node and
//! Dijkstra tie-breaking. The adjacency sets and `edges` always describe the
//! same edge set.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec3;
use hashbrown::{HashMap, HashSet};
use indexmap::{IndexMap, IndexSet};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::Serialize;
use structvista_animation_core::AnimationSequence;
use structvista_scene_core::{SceneRenderer, VisualHandle};

use crate::completion::{Completion, ConnectionKey, Outcome};
use crate::config::StructureConfig;
use crate::factory::StructureKind;
use crate::registry::Registry;
use crate::steps::{self, Step};
use crate::traits::{EdgeMutable, PathFindable, Sequence, Structure};

#[derive(Debug)]
struct GraphNode {
    handle: VisualHandle,
    position: Vec3,
    out: IndexSet<i64>,
}

/// A directed edge and the connector that draws it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: i64,
    pub to: i64,
    pub connector: VisualHandle,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Debug)]
pub struct Graph {
    cfg: StructureConfig,
    registry: Registry,
    nodes: IndexMap<i64, GraphNode>,
    edges: Vec<GraphEdge>,
    rng: StdRng,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(StructureConfig::default())
    }
}

impl Graph {
    pub fn new(cfg: StructureConfig) -> Self {
        let rng = match cfg.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::with_rng(cfg, rng)
    }

    /// Use `rng` to pick the random edge added on insert.
    pub fn with_rng(cfg: StructureConfig, rng: StdRng) -> Self {
        Self {
            cfg,
            registry: Registry::new(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
            rng,
        }
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
        }
    }

    #[inline]
    pub fn has_edge(&self, from: i64, to: i64) -> bool {
        self.nodes.get(&from).is_some_and(|n| n.out.contains(&to))
    }

    /// Out-neighbours of `value` in the order the edges were added.
    pub fn neighbors(&self, value: i64) -> Option<impl Iterator<Item = i64> + '_> {
        self.nodes.get(&value).map(|n| n.out.iter().copied())
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    fn edge(&self, from: i64, to: i64) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    /// Slot `index` on the circle when the graph holds `count` nodes.
    fn ring_position(&self, index: usize, count: usize) -> Vec3 {
        let slots = (count + 1).max(self.cfg.min_ring_slots);
        let angle = index as f32 * TAU / slots as f32;
        Vec3::new(
            self.cfg.graph_radius * angle.cos(),
            0.0,
            self.cfg.graph_radius * angle.sin(),
        )
    }

    fn add_edge_internal(
        &mut self,
        from: i64,
        to: i64,
        seq: &mut Vec<Step>,
        scene: &mut dyn SceneRenderer,
    ) -> bool {
        if self.has_edge(from, to) {
            return false;
        }
        let (Some(a), Some(b)) = (self.nodes.get(&from), self.nodes.get(&to)) else {
            return false;
        };
        let (from_pos, to_pos) = (a.position, b.position);
        let connector = scene.create_connector(from_pos, to_pos, self.cfg.palette.graph_edge, true);
        self.registry
            .insert_connector(ConnectionKey::new(from, to), connector);
        if let Some(node) = self.nodes.get_mut(&from) {
            node.out.insert(to);
        }
        self.edges.push(GraphEdge {
            from,
            to,
            connector,
        });
        seq.push(steps::connect(&self.cfg, connector, from_pos, to_pos));
        true
    }

    /// Drop the edge from the model now; its connector goes when the
    /// disconnect step completes.
    fn remove_edge_internal(&mut self, from: i64, to: i64, seq: &mut Vec<Step>) -> bool {
        let removed = self
            .nodes
            .get_mut(&from)
            .is_some_and(|n| n.out.shift_remove(&to));
        let Some(index) = self.edges.iter().position(|e| e.from == from && e.to == to) else {
            debug_assert!(!removed, "edge {from}->{to} missing from edge list");
            return removed;
        };
        let edge = self.edges.remove(index);
        seq.push(steps::disconnect(
            &self.cfg,
            ConnectionKey::new(from, to),
            edge.connector,
        ));
        true
    }

    fn relayout(&mut self, scene: &mut dyn SceneRenderer) {
        let count = self.nodes.len();
        for index in 0..count {
            let position = self.ring_position(index, count);
            if let Some((_, node)) = self.nodes.get_index_mut(index) {
                node.position = position;
                scene.set_position(node.handle, position);
            }
        }
        for edge in &self.edges {
            if let (Some(a), Some(b)) = (self.nodes.get(&edge.from), self.nodes.get(&edge.to)) {
                scene.update_connector_endpoints(edge.connector, a.position, b.position);
            }
        }
    }

    /// Unit-weight Dijkstra from `start`. Returns the settle order and the
    /// predecessor of every reached node.
    fn dijkstra(&self, start: i64, end: i64) -> (Vec<i64>, HashMap<i64, i64>) {
        let mut dist: IndexMap<i64, Option<usize>> = self
            .nodes
            .keys()
            .map(|&v| (v, (v == start).then_some(0)))
            .collect();
        let mut prev = HashMap::new();
        let mut settled = Vec::new();

        loop {
            // Strict `<` keeps the earliest-inserted node on ties.
            let mut best: Option<(i64, usize)> = None;
            for (&v, d) in &dist {
                if let Some(d) = *d {
                    if best.map_or(true, |(_, bd)| d < bd) {
                        best = Some((v, d));
                    }
                }
            }
            let Some((current, d)) = best else { break };
            dist.shift_remove(&current);
            settled.push(current);
            if current == end {
                break;
            }
            let Some(node) = self.nodes.get(&current) else { continue };
            for next in &node.out {
                if let Some(slot) = dist.get_mut(next) {
                    if slot.map_or(true, |nd| d + 1 < nd) {
                        *slot = Some(d + 1);
                        prev.insert(*next, current);
                    }
                }
            }
        }
        (settled, prev)
    }
}

impl Structure for Graph {
    fn kind(&self) -> StructureKind {
        StructureKind::Graph
    }

    fn insert(&mut self, value: i64, scene: &mut dyn SceneRenderer) -> Option<Sequence> {
        if self.has_value(value) {
            log::debug!("graph: {} already present", value);
            return None;
        }
        let count = self.nodes.len();
        let position = self.ring_position(count, count);
        let handle = scene.create_visual_node(value, position, self.cfg.palette.graph_node);
        let others: Vec<i64> = self.nodes.keys().copied().collect();
        self.nodes.insert(
            value,
            GraphNode {
                handle,
                position,
                out: IndexSet::new(),
            },
        );
        self.registry.insert_node(value, handle);

        let mut plan = vec![steps::create(&self.cfg, handle)];
        if let Some(&target) = others.choose(&mut self.rng) {
            self.add_edge_internal(value, target, &mut plan, scene);
        }
        log::debug!("graph: insert {} ({} nodes)", value, self.nodes.len());

        let mut seq = AnimationSequence::new()
            .with_completion(Completion::finished(Outcome::Inserted { value }));
        seq.extend(plan);
        Some(seq)
    }

    fn delete(&mut self, value: i64, _scene: &mut dyn SceneRenderer) -> Option<Sequence> {
        let handle = self.nodes.get(&value)?.handle;
        let mut plan = vec![steps::doomed(&self.cfg, handle)];

        let outgoing: Vec<i64> = self.nodes[&value].out.iter().copied().collect();
        for to in outgoing {
            self.remove_edge_internal(value, to, &mut plan);
        }
        let incoming: Vec<i64> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.out.contains(&value))
            .map(|(&from, _)| from)
            .collect();
        for from in incoming {
            self.remove_edge_internal(from, value, &mut plan);
        }

        plan.push(steps::destroy(&self.cfg, value, handle));
        self.nodes.shift_remove(&value);
        log::debug!("graph: delete {} ({} nodes left)", value, self.nodes.len());

        let mut seq = AnimationSequence::new()
            .with_completion(Completion::finished_with_relayout(Outcome::Deleted { value }));
        seq.extend(plan);
        Some(seq)
    }

    fn search(&self, value: i64) -> Sequence {
        let mut seq = AnimationSequence::new();
        let mut found = false;
        if let Some(&start) = self.nodes.keys().next() {
            let mut visited = HashSet::new();
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                if !visited.insert(current) {
                    continue;
                }
                let Some(node) = self.nodes.get(&current) else { continue };
                if current == value {
                    seq.push(steps::found(&self.cfg, node.handle));
                    found = true;
                    break;
                }
                seq.push(steps::visit(&self.cfg, node.handle));
                queue.extend(node.out.iter().filter(|n| !visited.contains(*n)));
            }
        }
        seq.with_completion(Completion::finished(Outcome::Searched { value, found }))
    }

    fn clear(&mut self, scene: &mut dyn SceneRenderer) {
        self.registry.clear(scene);
        self.nodes.clear();
        self.edges.clear();
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
        log::info!("graph: {}", outcome);
        Some(outcome)
    }

    fn has_value(&self, value: i64) -> bool {
        self.nodes.contains_key(&value)
    }

    fn values(&self) -> Vec<i64> {
        self.nodes.keys().copied().collect()
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }

    fn as_edge_mutable(&mut self) -> Option<&mut dyn EdgeMutable> {
        Some(self)
    }

    fn as_path_findable(&mut self) -> Option<&mut dyn PathFindable> {
        Some(self)
    }
}

impl EdgeMutable for Graph {
    fn add_edge(
        &mut self,
        from: i64,
        to: i64,
        scene: &mut dyn SceneRenderer,
    ) -> Option<Sequence> {
        if !self.has_value(from) || !self.has_value(to) || self.has_edge(from, to) {
            log::debug!("graph: edge {} -> {} not added", from, to);
            return None;
        }
        let mut plan = Vec::new();
        self.add_edge_internal(from, to, &mut plan, scene);
        let mut seq = AnimationSequence::new()
            .with_completion(Completion::finished(Outcome::EdgeAdded { from, to }));
        seq.extend(plan);
        Some(seq)
    }

    fn remove_edge(
        &mut self,
        from: i64,
        to: i64,
        _scene: &mut dyn SceneRenderer,
    ) -> Option<Sequence> {
        if !self.has_edge(from, to) {
            log::debug!("graph: no edge {} -> {}", from, to);
            return None;
        }
        let mut plan = Vec::new();
        self.remove_edge_internal(from, to, &mut plan);
        let mut seq = AnimationSequence::new()
            .with_completion(Completion::finished(Outcome::EdgeRemoved { from, to }));
        seq.extend(plan);
        Some(seq)
    }
}

impl PathFindable for Graph {
    fn find_shortest_path(&self, start: i64, end: i64) -> Option<Sequence> {
        if !self.has_value(start) || !self.has_value(end) {
            return None;
        }
        let (settled, prev) = self.dijkstra(start, end);

        let mut seq = AnimationSequence::new();
        for v in &settled {
            let handle = self.nodes[v].handle;
            if *v == end {
                seq.push(steps::mark(&self.cfg, handle));
            } else {
                seq.push(steps::visit(&self.cfg, handle));
            }
        }

        let path = settled.last().filter(|v| **v == end).map(|_| {
            let mut path = vec![end];
            let mut cursor = end;
            while let Some(&p) = prev.get(&cursor) {
                path.push(p);
                cursor = p;
            }
            path.reverse();
            path
        });
        if let Some(path) = &path {
            for pair in path.windows(2) {
                if let Some(edge) = self.edge(pair[0], pair[1]) {
                    seq.push(steps::found(&self.cfg, edge.connector));
                }
            }
        }
        log::debug!("graph: shortest path {} -> {}: {:?}", start, end, path);
        Some(seq.with_completion(Completion::finished(Outcome::ShortestPath { start, end, path })))
    }
}
