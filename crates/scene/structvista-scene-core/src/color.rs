//! Colour hints passed to the renderer.
//!
//! The core only chooses *which* colour a visual effect uses; how the colour is
//! applied (material, emissive, outline) belongs to the renderer.

use serde::{Deserialize, Serialize};

/// 24-bit RGB colour stored as `0xRRGGBB`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Default list/tree node body.
    pub const NODE: Color = Color(0x4a90e2);
    /// Default list/tree connector.
    pub const CONNECTOR: Color = Color(0x667eea);
    /// Graph node body.
    pub const GRAPH_NODE: Color = Color(0x9c27b0);
    /// Graph edge.
    pub const GRAPH_EDGE: Color = Color(0xe91e63);
    /// Traversal: a node being visited.
    pub const AMBER: Color = Color(0xffeb3b);
    /// Success: match found, tail reached, path edge.
    pub const GREEN: Color = Color(0x4caf50);
    /// A node about to be removed.
    pub const RED: Color = Color(0xff5722);
    /// Used when a highlight step carries no colour.
    pub const FALLBACK_HIGHLIGHT: Color = Color(0xff6b6b);

    #[inline]
    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    #[inline]
    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    #[inline]
    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Channels normalized to `[0, 1]`.
    pub fn to_rgb_f32(self) -> [f32; 3] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        ]
    }

    /// Component-wise blend towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u32 { (a as f32 + (b as f32 - a as f32) * t).round() as u32 };
        Color(
            (mix(self.r(), other.r()) << 16)
                | (mix(self.g(), other.g()) << 8)
                | mix(self.b(), other.b()),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::NODE
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_and_display() {
        let c = Color(0x4caf50);
        assert_eq!((c.r(), c.g(), c.b()), (0x4c, 0xaf, 0x50));
        assert_eq!(c.to_string(), "#4caf50");
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color(0x000000);
        let b = Color(0xffffff);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, 0.5), Color(0x808080));
    }
}
