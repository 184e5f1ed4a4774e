//! In-memory renderer that keeps the last known state of every object and a
//! log of the calls it received.

use glam::Vec3;
use hashbrown::HashMap;

use crate::color::Color;
use crate::handle::{HandleAllocator, VisualHandle};
use crate::renderer::SceneRenderer;

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    Node { label: i64 },
    Connector { from: Vec3, to: Vec3, directed: bool },
}

/// Last known state of one object.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub position: Vec3,
    pub scale: Vec3,
    pub color: Color,
    pub highlight: Option<(Color, f32)>,
}

/// One renderer call, in the order received.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneCall {
    CreateNode { handle: VisualHandle, value: i64 },
    CreateConnector { handle: VisualHandle, directed: bool },
    UpdateEndpoints { handle: VisualHandle },
    UpdateLabel { handle: VisualHandle, value: i64 },
    Remove { handle: VisualHandle },
    SetHighlight { handle: VisualHandle, color: Color },
    ClearHighlight { handle: VisualHandle },
    SetPosition { handle: VisualHandle },
    SetScale { handle: VisualHandle },
}

#[derive(Debug, Default)]
pub struct RecordingScene {
    ids: HandleAllocator,
    objects: HashMap<VisualHandle, SceneObject>,
    calls: Vec<SceneCall>,
    /// Calls addressed to handles that no longer exist.
    stale_calls: usize,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, handle: VisualHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    /// Every live object, in no particular order.
    pub fn objects(&self) -> impl Iterator<Item = (VisualHandle, &SceneObject)> {
        self.objects.iter().map(|(h, o)| (*h, o))
    }

    pub fn contains(&self, handle: VisualHandle) -> bool {
        self.objects.contains_key(&handle)
    }

    /// Number of live objects (nodes and connectors).
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.objects
            .values()
            .filter(|o| matches!(o.kind, ObjectKind::Node { .. }))
            .count()
    }

    pub fn connector_count(&self) -> usize {
        self.objects
            .values()
            .filter(|o| matches!(o.kind, ObjectKind::Connector { .. }))
            .count()
    }

    /// Label of the node behind `handle`, if it is a live node.
    pub fn label(&self, handle: VisualHandle) -> Option<i64> {
        match self.objects.get(&handle)?.kind {
            ObjectKind::Node { label } => Some(label),
            ObjectKind::Connector { .. } => None,
        }
    }

    pub fn calls(&self) -> &[SceneCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn stale_calls(&self) -> usize {
        self.stale_calls
    }

    fn touch(&mut self, handle: VisualHandle) -> Option<&mut SceneObject> {
        let found = self.objects.get_mut(&handle);
        if found.is_none() {
            self.stale_calls += 1;
            log::trace!("scene call on unknown handle {:?}", handle);
        }
        found
    }
}

impl SceneRenderer for RecordingScene {
    fn create_visual_node(&mut self, value: i64, position: Vec3, color: Color) -> VisualHandle {
        let handle = self.ids.alloc();
        self.objects.insert(
            handle,
            SceneObject {
                kind: ObjectKind::Node { label: value },
                position,
                scale: Vec3::ONE,
                color,
                highlight: None,
            },
        );
        self.calls.push(SceneCall::CreateNode { handle, value });
        handle
    }

    fn create_connector(
        &mut self,
        from: Vec3,
        to: Vec3,
        color: Color,
        directed: bool,
    ) -> VisualHandle {
        let handle = self.ids.alloc();
        self.objects.insert(
            handle,
            SceneObject {
                kind: ObjectKind::Connector { from, to, directed },
                position: from,
                scale: Vec3::ONE,
                color,
                highlight: None,
            },
        );
        self.calls.push(SceneCall::CreateConnector { handle, directed });
        handle
    }

    fn update_connector_endpoints(&mut self, handle: VisualHandle, from: Vec3, to: Vec3) {
        self.calls.push(SceneCall::UpdateEndpoints { handle });
        if let Some(obj) = self.touch(handle) {
            if let ObjectKind::Connector {
                from: f, to: t, ..
            } = &mut obj.kind
            {
                *f = from;
                *t = to;
                obj.position = from;
            }
        }
    }

    fn update_label(&mut self, handle: VisualHandle, value: i64) {
        self.calls.push(SceneCall::UpdateLabel { handle, value });
        if let Some(obj) = self.touch(handle) {
            if let ObjectKind::Node { label } = &mut obj.kind {
                *label = value;
            }
        }
    }

    fn remove_visual_object(&mut self, handle: VisualHandle) {
        self.calls.push(SceneCall::Remove { handle });
        if self.objects.remove(&handle).is_none() {
            self.stale_calls += 1;
        }
    }

    fn set_highlight(&mut self, handle: VisualHandle, color: Color, intensity: f32) {
        self.calls.push(SceneCall::SetHighlight { handle, color });
        if let Some(obj) = self.touch(handle) {
            obj.highlight = Some((color, intensity));
        }
    }

    fn clear_highlight(&mut self, handle: VisualHandle) {
        self.calls.push(SceneCall::ClearHighlight { handle });
        if let Some(obj) = self.touch(handle) {
            obj.highlight = None;
        }
    }

    fn set_position(&mut self, handle: VisualHandle, position: Vec3) {
        self.calls.push(SceneCall::SetPosition { handle });
        if let Some(obj) = self.touch(handle) {
            obj.position = position;
        }
    }

    fn set_scale(&mut self, handle: VisualHandle, scale: Vec3) {
        self.calls.push(SceneCall::SetScale { handle });
        if let Some(obj) = self.touch(handle) {
            obj.scale = scale;
        }
    }
}
