//! Layout, timing and palette settings shared by the structure engines.

use serde::{Deserialize, Serialize};
use structvista_scene_core::Color;

use crate::error::StructureError;

/// Colours handed to the renderer and used by highlight steps.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Palette {
    pub node: Color,
    pub connector: Color,
    pub graph_node: Color,
    pub graph_edge: Color,
    /// Traversal of a node that is not the one being looked for.
    pub visit: Color,
    /// Match, old tail, shortest-path edges.
    pub found: Color,
    /// Node about to be deleted.
    pub removal: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            node: Color::NODE,
            connector: Color::CONNECTOR,
            graph_node: Color::GRAPH_NODE,
            graph_edge: Color::GRAPH_EDGE,
            visit: Color::AMBER,
            found: Color::GREEN,
            removal: Color::RED,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StructureConfig {
    /// Horizontal distance between list slots.
    pub node_spacing: f32,
    /// Vertical distance between tree levels.
    pub level_height: f32,
    /// Horizontal offset of a depth-1 child; halves at every level below.
    pub level_width: f32,
    /// Radius of the graph's circular layout.
    pub graph_radius: f32,
    /// Minimum number of slots on the graph circle.
    pub min_ring_slots: usize,
    /// Logical duration of traversal highlights and disconnects.
    pub visit_duration: f32,
    /// Logical duration of create, destroy, connect and match highlights.
    pub effect_duration: f32,
    pub palette: Palette,
    /// Seed for the graph's random edge on insert. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            node_spacing: 3.0,
            level_height: 3.0,
            level_width: 4.0,
            graph_radius: 5.0,
            min_ring_slots: 6,
            visit_duration: 0.3,
            effect_duration: 0.5,
            palette: Palette::default(),
            rng_seed: None,
        }
    }
}

impl StructureConfig {
    pub fn from_json_str(json: &str) -> Result<Self, StructureError> {
        let cfg: StructureConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), StructureError> {
        let positive = [
            ("node_spacing", self.node_spacing),
            ("level_height", self.level_height),
            ("level_width", self.level_width),
            ("graph_radius", self.graph_radius),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(StructureError::InvalidConfig { field, value });
            }
        }
        for (field, value) in [
            ("visit_duration", self.visit_duration),
            ("effect_duration", self.effect_duration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StructureError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }

    /// Copy of this config with a fixed random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg =
            StructureConfig::from_json_str(r#"{ "node_spacing": 2.5, "palette": { "visit": 255 } }"#)
                .unwrap();
        assert_eq!(cfg.node_spacing, 2.5);
        assert_eq!(cfg.level_width, 4.0);
        assert_eq!(cfg.palette.visit, Color(255));
        assert_eq!(cfg.palette.found, Color::GREEN);
        assert_eq!(cfg.rng_seed, None);
    }

    #[test]
    fn rejects_degenerate_layout() {
        let err = StructureConfig::from_json_str(r#"{ "graph_radius": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            StructureError::InvalidConfig {
                field: "graph_radius",
                ..
            }
        ));
        assert!(matches!(
            StructureConfig::from_json_str(r#"{ "node_spacing": "wide" }"#),
            Err(StructureError::Config(_))
        ));
        assert!(matches!(
            StructureConfig::from_json_str("\"linked-list\""),
            Err(StructureError::Config(_))
        ));
    }
}
