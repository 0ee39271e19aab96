//! Diagram data model: placed tokens, annotated paths and the aggregate that
//! owns them.

mod diagram;
mod element;
mod path;

pub use diagram::{Diagram, DiagramItem, DiagramSnapshot, Hit, MAX_JERSEY_NUMBER};
pub(crate) use diagram::BALL_Z_BIAS;
pub use element::{Element, ElementKind, TeamColor};
pub use path::{DrawingPath, PathAttrs, PathType};

use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for placed elements.
pub type ElementId = Uuid;

/// Unique identifier for drawing paths.
pub type PathId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Same colour with alpha scaled by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_round_trip() {
        let c = SerializableColor::new(12, 34, 56, 200);
        let peniko: Color = c.into();
        assert_eq!(SerializableColor::from(peniko), c);
    }

    #[test]
    fn test_with_opacity() {
        let c = SerializableColor::white().with_opacity(0.5);
        assert_eq!(c.a, 128);
        assert_eq!(SerializableColor::white().with_opacity(2.0).a, 255);
    }
}
