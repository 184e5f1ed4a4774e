//! Renderer capability trait.
//!
//! Hosts (a wgpu viewer, a web canvas, the in-memory [`crate::RecordingScene`])
//! implement this and hand it to the structure and playback engines. The core
//! owns *when* and *with what parameters* each call happens; the renderer owns
//! how it looks.

use glam::Vec3;

use crate::color::Color;
use crate::handle::VisualHandle;

pub trait SceneRenderer {
    /// Create a labelled node shape at `position` and return its handle.
    fn create_visual_node(&mut self, value: i64, position: Vec3, color: Color) -> VisualHandle;

    /// Create a line between two points; `directed` adds an arrowhead at `to`.
    fn create_connector(&mut self, from: Vec3, to: Vec3, color: Color, directed: bool)
        -> VisualHandle;

    fn update_connector_endpoints(&mut self, handle: VisualHandle, from: Vec3, to: Vec3);

    /// Replace the label shown on a node.
    fn update_label(&mut self, handle: VisualHandle, value: i64);

    /// Drop the object. Unknown handles are ignored.
    fn remove_visual_object(&mut self, handle: VisualHandle);

    fn set_highlight(&mut self, handle: VisualHandle, color: Color, intensity: f32);

    fn clear_highlight(&mut self, handle: VisualHandle);

    fn set_position(&mut self, handle: VisualHandle, position: Vec3);

    fn set_scale(&mut self, handle: VisualHandle, scale: Vec3);
}
