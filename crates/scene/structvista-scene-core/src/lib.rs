//! StructVista scene boundary.
//!
//! The core never draws anything itself. Structure engines and the playback
//! engine talk to the host through [`SceneRenderer`], addressing visual objects
//! by opaque [`VisualHandle`]s. [`RecordingScene`] is an in-memory renderer for
//! headless hosts and tests.

pub mod color;
pub mod handle;
pub mod recording;
pub mod renderer;

pub use color::Color;
pub use glam::Vec3;
pub use handle::{HandleAllocator, VisualHandle};
pub use recording::{ObjectKind, RecordingScene, SceneCall, SceneObject};
pub use renderer::SceneRenderer;
