//! StructVista structure engines.
//!
//! Each engine owns its logical data and the visual handles that represent
//! it. Mutating operations change the logical model immediately and return an
//! [`AnimationSequence`](structvista_animation_core::AnimationSequence) whose
//! [`Completion`]s must be routed back through [`Structure::complete`] once the
//! playback engine fires them. Visual objects are only ever removed from the
//! scene by those completions (or by [`Structure::clear`]).

pub mod completion;
pub mod config;
pub mod error;
pub mod factory;
pub mod graph;
pub mod list;
pub mod registry;
pub mod steps;
pub mod traits;
pub mod tree;

pub use completion::{Completion, ConnectionKey, Outcome};
pub use config::{Palette, StructureConfig};
pub use error::StructureError;
pub use factory::{create, StructureKind};
pub use graph::{Graph, GraphEdge, GraphStats};
pub use list::LinkedList;
pub use registry::Registry;
pub use traits::{EdgeMutable, PathFindable, Sequence, Structure};
pub use tree::BinaryTree;
