//! Binary search tree engine.
//!
//! Equal values are never stored twice; comparisons send `value < node` left
//! and everything else right. Deleting a node with two children copies the
//! in-order successor's value (and label) into it and removes the successor
//! node instead, so the target keeps its visual.

use glam::Vec3;
use indexmap::IndexMap;
use structvista_animation_core::AnimationSequence;
use structvista_scene_core::{SceneRenderer, VisualHandle};

use crate::completion::{Completion, ConnectionKey, Outcome};
use crate::config::StructureConfig;
use crate::factory::StructureKind;
use crate::registry::Registry;
use crate::steps::{self, Step};
use crate::traits::{Sequence, Structure};

type Link = Option<Box<TreeNode>>;

#[derive(Debug)]
struct TreeNode {
    value: i64,
    depth: u32,
    position: Vec3,
    handle: VisualHandle,
    /// Connector from the parent; `None` for the root.
    link: Option<VisualHandle>,
    left: Link,
    right: Link,
}

impl TreeNode {
    fn child(&self, value: i64) -> &Link {
        if value < self.value {
            &self.left
        } else {
            &self.right
        }
    }
}

/// Parent of the subtree currently being edited.
#[derive(Clone, Copy)]
struct Parent {
    value: i64,
    position: Vec3,
}

#[derive(Debug)]
pub struct BinaryTree {
    cfg: StructureConfig,
    registry: Registry,
    root: Link,
    len: usize,
}

impl Default for BinaryTree {
    fn default() -> Self {
        Self::new(StructureConfig::default())
    }
}

impl BinaryTree {
    pub fn new(cfg: StructureConfig) -> Self {
        Self {
            cfg,
            registry: Registry::new(),
            root: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn inorder(&self) -> Vec<i64> {
        fn walk(node: &Link, out: &mut Vec<i64>) {
            if let Some(n) = node {
                walk(&n.left, out);
                out.push(n.value);
                walk(&n.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut out);
        out
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn height(node: &Link) -> usize {
            node.as_ref()
                .map_or(0, |n| 1 + height(&n.left).max(height(&n.right)))
        }
        height(&self.root)
    }

    /// Depth of `value`, root = 0.
    pub fn depth_of(&self, value: i64) -> Option<u32> {
        self.path_to(value)
            .last()
            .filter(|n| n.value == value)
            .map(|n| n.depth)
    }

    /// Nodes from the root down to `value` or to the last node before the
    /// search falls off the tree.
    fn path_to(&self, value: i64) -> Vec<&TreeNode> {
        let mut path = Vec::new();
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            path.push(node);
            if node.value == value {
                break;
            }
            cursor = node.child(value).as_deref();
        }
        path
    }

    /// Remove `value` from the subtree and return the new subtree root.
    fn remove(
        &mut self,
        node: Link,
        value: i64,
        parent: Option<Parent>,
        seq: &mut Vec<Step>,
        scene: &mut dyn SceneRenderer,
    ) -> Link {
        let mut node = node?;
        if value < node.value {
            let here = Parent {
                value: node.value,
                position: node.position,
            };
            node.left = self.remove(node.left.take(), value, Some(here), seq, scene);
            return Some(node);
        }
        if value > node.value {
            let here = Parent {
                value: node.value,
                position: node.position,
            };
            node.right = self.remove(node.right.take(), value, Some(here), seq, scene);
            return Some(node);
        }

        match (node.left.take(), node.right.take()) {
            (Some(left), Some(right)) => {
                let successor = min_value(&right);
                log::debug!("tree: {} takes successor value {}", node.value, successor);
                node.value = successor;
                scene.update_label(node.handle, successor);
                node.left = Some(left);
                let here = Parent {
                    value: node.value,
                    position: node.position,
                };
                node.right = self.remove(Some(right), successor, Some(here), seq, scene);
                Some(node)
            }
            (left, right) => {
                let mut child = left.or(right);
                if let (Some(p), Some(link)) = (parent, node.link) {
                    seq.push(steps::disconnect(
                        &self.cfg,
                        ConnectionKey::new(p.value, node.value),
                        link,
                    ));
                }
                if let Some(c) = child.as_deref() {
                    if let Some(link) = c.link {
                        seq.push(steps::disconnect(
                            &self.cfg,
                            ConnectionKey::new(node.value, c.value),
                            link,
                        ));
                    }
                }
                seq.push(steps::destroy(&self.cfg, node.value, node.handle));
                self.len -= 1;

                if let Some(c) = child.as_deref_mut() {
                    c.link = None;
                    if let Some(p) = parent {
                        let connector = scene.create_connector(
                            p.position,
                            c.position,
                            self.cfg.palette.connector,
                            false,
                        );
                        self.registry
                            .insert_connector(ConnectionKey::new(p.value, c.value), connector);
                        seq.push(steps::connect(&self.cfg, connector, p.position, c.position));
                        c.link = Some(connector);
                    }
                }
                child
            }
        }
    }

    /// Reposition every node top-down with the insert formula, refresh
    /// connectors, recompute depths and rebuild the registry from the nodes.
    fn relayout(&mut self, scene: &mut dyn SceneRenderer) {
        let mut rebuilt = Rebuilt::default();
        if let Some(root) = self.root.as_deref_mut() {
            place(root, Vec3::ZERO, 0, None, &self.cfg, scene, &mut rebuilt);
        }
        self.registry.rebuild(rebuilt.nodes, rebuilt.connectors);
    }
}

/// Child position relative to its parent: `levelWidth / 2^(depth-1)` to the
/// side and one level down.
fn child_position(cfg: &StructureConfig, parent: Vec3, left: bool, depth: u32) -> Vec3 {
    let offset = cfg.level_width / 2f32.powi(depth as i32 - 1);
    let dx = if left { -offset } else { offset };
    Vec3::new(parent.x + dx, -(depth as f32) * cfg.level_height, 0.0)
}

#[derive(Default)]
struct Rebuilt {
    nodes: IndexMap<i64, VisualHandle>,
    connectors: IndexMap<ConnectionKey, VisualHandle>,
}

fn place(
    node: &mut TreeNode,
    position: Vec3,
    depth: u32,
    parent: Option<Parent>,
    cfg: &StructureConfig,
    scene: &mut dyn SceneRenderer,
    out: &mut Rebuilt,
) {
    node.depth = depth;
    node.position = position;
    scene.set_position(node.handle, position);
    out.nodes.insert(node.value, node.handle);
    if let (Some(p), Some(link)) = (parent, node.link) {
        scene.update_connector_endpoints(link, p.position, position);
        out.connectors
            .insert(ConnectionKey::new(p.value, node.value), link);
    }
    let here = Some(Parent {
        value: node.value,
        position,
    });
    if let Some(left) = node.left.as_deref_mut() {
        let at = child_position(cfg, position, true, depth + 1);
        place(left, at, depth + 1, here, cfg, scene, out);
    }
    if let Some(right) = node.right.as_deref_mut() {
        let at = child_position(cfg, position, false, depth + 1);
        place(right, at, depth + 1, here, cfg, scene, out);
    }
}

fn min_value(node: &TreeNode) -> i64 {
    let mut cursor = node;
    while let Some(left) = cursor.left.as_deref() {
        cursor = left;
    }
    cursor.value
}

impl Structure for BinaryTree {
    fn kind(&self) -> StructureKind {
        StructureKind::BinaryTree
    }

    fn insert(&mut self, value: i64, scene: &mut dyn SceneRenderer) -> Option<Sequence> {
        if self.has_value(value) {
            log::debug!("tree: {} already present", value);
            return None;
        }
        let mut seq = AnimationSequence::new()
            .with_completion(Completion::finished(Outcome::Inserted { value }));

        let path = self.path_to(value);
        let Some(parent) = path.last().map(|p| (p.value, p.depth, p.position)) else {
            let handle = scene.create_visual_node(value, Vec3::ZERO, self.cfg.palette.node);
            self.root = Some(Box::new(TreeNode {
                value,
                depth: 0,
                position: Vec3::ZERO,
                handle,
                link: None,
                left: None,
                right: None,
            }));
            self.registry.insert_node(value, handle);
            self.len = 1;
            seq.push(steps::create(&self.cfg, handle));
            return Some(seq);
        };
        for node in &path {
            seq.push(steps::visit(&self.cfg, node.handle));
        }

        let (parent_value, parent_depth, parent_position) = parent;
        let depth = parent_depth + 1;
        let left = value < parent_value;
        let position = child_position(&self.cfg, parent_position, left, depth);
        let handle = scene.create_visual_node(value, position, self.cfg.palette.node);
        let link =
            scene.create_connector(parent_position, position, self.cfg.palette.connector, false);

        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = if value < node.value {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Box::new(TreeNode {
            value,
            depth,
            position,
            handle,
            link: Some(link),
            left: None,
            right: None,
        }));

        self.registry.insert_node(value, handle);
        self.registry
            .insert_connector(ConnectionKey::new(parent_value, value), link);
        self.len += 1;
        seq.push(steps::create(&self.cfg, handle));
        seq.push(steps::connect(&self.cfg, link, parent_position, position));
        log::debug!("tree: insert {} at depth {}", value, depth);
        Some(seq)
    }

    fn delete(&mut self, value: i64, scene: &mut dyn SceneRenderer) -> Option<Sequence> {
        if !self.has_value(value) {
            log::debug!("tree: {} not present", value);
            return None;
        }
        let mut seq = AnimationSequence::new()
            .with_completion(Completion::finished_with_relayout(Outcome::Deleted { value }));
        for node in self.path_to(value) {
            if node.value == value {
                seq.push(steps::doomed(&self.cfg, node.handle));
            } else {
                seq.push(steps::visit(&self.cfg, node.handle));
            }
        }

        let mut removal = Vec::new();
        let root = self.root.take();
        self.root = self.remove(root, value, None, &mut removal, scene);
        seq.extend(removal);
        debug_assert!(!self.has_value(value), "tree still holds {value}");
        log::debug!("tree: delete {} ({} nodes left)", value, self.len);
        Some(seq)
    }

    fn search(&self, value: i64) -> Sequence {
        let mut seq = AnimationSequence::new();
        let mut found = false;
        for node in self.path_to(value) {
            if node.value == value {
                seq.push(steps::found(&self.cfg, node.handle));
                found = true;
            } else {
                seq.push(steps::visit(&self.cfg, node.handle));
            }
        }
        seq.with_completion(Completion::finished(Outcome::Searched { value, found }))
    }

    fn clear(&mut self, scene: &mut dyn SceneRenderer) {
        self.registry.clear(scene);
        self.root = None;
        self.len = 0;
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
        log::info!("tree: {}", outcome);
        Some(outcome)
    }

    fn has_value(&self, value: i64) -> bool {
        self.path_to(value).last().is_some_and(|n| n.value == value)
    }

    fn values(&self) -> Vec<i64> {
        self.inorder()
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use structvista_animation_core::StepKind;
    use structvista_scene_core::{Color, RecordingScene};

    fn settle(tree: &mut BinaryTree, seq: Sequence, scene: &mut RecordingScene) {
        for c in seq.into_completions() {
            tree.complete(c, scene);
        }
    }

    fn filled(values: &[i64], scene: &mut RecordingScene) -> BinaryTree {
        let mut tree = BinaryTree::default();
        for v in values {
            let seq = tree.insert(*v, scene).unwrap();
            settle(&mut tree, seq, scene);
        }
        tree
    }

    #[test]
    fn root_insert_has_no_traversal() {
        let mut scene = RecordingScene::new();
        let mut tree = BinaryTree::default();
        let seq = tree.insert(50, &mut scene).unwrap();
        assert_eq!(seq.kinds(), vec![StepKind::Create]);
        assert_eq!(tree.depth_of(50), Some(0));
    }

    #[test]
    fn child_positions_halve_per_level() {
        let mut scene = RecordingScene::new();
        let tree = filled(&[50, 30, 70, 20, 40], &mut scene);
        let pos = |v: i64| scene.object(tree.registry().node(v).unwrap()).unwrap().position;

        assert_abs_diff_eq!(pos(30).x, -4.0);
        assert_abs_diff_eq!(pos(70).x, 4.0);
        assert_abs_diff_eq!(pos(20).x, -6.0);
        assert_abs_diff_eq!(pos(40).x, -2.0);
        assert_abs_diff_eq!(pos(40).y, -6.0);
        assert_eq!(tree.depth_of(40), Some(2));
    }

    #[test]
    fn insert_highlights_path_then_creates_and_connects() {
        let mut scene = RecordingScene::new();
        let mut tree = filled(&[50, 30], &mut scene);
        let seq = tree.insert(40, &mut scene).unwrap();
        assert_eq!(
            seq.kinds(),
            vec![
                StepKind::Highlight,
                StepKind::Highlight,
                StepKind::Create,
                StepKind::Connect
            ]
        );
        assert!(tree
            .registry()
            .contains_connector(ConnectionKey::new(30, 40)));
    }

    #[test]
    fn leaf_delete_releases_node_and_link() {
        let mut scene = RecordingScene::new();
        let mut tree = filled(&[50, 30], &mut scene);
        let seq = tree.delete(30, &mut scene).unwrap();
        assert_eq!(
            seq.kinds(),
            vec![
                StepKind::Highlight,
                StepKind::Highlight,
                StepKind::Disconnect,
                StepKind::Destroy
            ]
        );
        assert_eq!(seq.highlights()[1].1, Color::RED);
        settle(&mut tree, seq, &mut scene);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.connector_count(), 0);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn one_child_delete_promotes_child() {
        let mut scene = RecordingScene::new();
        let mut tree = filled(&[50, 30, 20], &mut scene);
        let seq = tree.delete(30, &mut scene).unwrap();
        settle(&mut tree, seq, &mut scene);

        assert_eq!(tree.inorder(), vec![20, 50]);
        assert_eq!(tree.depth_of(20), Some(1));
        let keys: Vec<_> = tree.registry().connector_keys().collect();
        assert_eq!(keys, vec![ConnectionKey::new(50, 20)]);
        assert_eq!(scene.connector_count(), 1);
        let h20 = tree.registry().node(20).unwrap();
        assert_abs_diff_eq!(scene.object(h20).unwrap().position.x, -4.0);
    }

    #[test]
    fn two_child_delete_keeps_target_visual() {
        let mut scene = RecordingScene::new();
        let mut tree = filled(&[50, 30, 70, 20, 40], &mut scene);
        let target = tree.registry().node(30).unwrap();
        let seq = tree.delete(30, &mut scene).unwrap();
        assert_eq!(scene.label(target), Some(40));
        settle(&mut tree, seq, &mut scene);

        assert_eq!(tree.inorder(), vec![20, 40, 50, 70]);
        assert_eq!(tree.registry().node(40), Some(target));
        assert!(!tree.registry().contains_node(30));
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.connector_count(), 3);
        assert_eq!(scene.node_count(), 4);
        assert_eq!(scene.connector_count(), 3);
    }

    #[test]
    fn failed_search_has_no_green_step() {
        let mut scene = RecordingScene::new();
        let tree = filled(&[50, 30, 70], &mut scene);
        let seq = tree.search(35);
        let colors: Vec<Color> = seq.highlights().into_iter().map(|(_, c)| c).collect();
        assert_eq!(colors, vec![Color::AMBER, Color::AMBER]);
        assert!(matches!(
            seq.on_complete,
            Some(Completion::Finished {
                outcome: Outcome::Searched { found: false, .. },
                ..
            })
        ));
    }
}
