//! Board configuration: interaction tolerances and default styles.

use crate::error::BoardResult;
use crate::model::SerializableColor;
use crate::surface::Surface;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Tunables for an editing session.
///
/// Pixel-valued fields are converted through [`BoardConfig::surface`] so that
/// tolerances feel the same regardless of how large the board is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// On-screen size of the playing surface in pixels.
    pub surface_size: Size,
    /// Minimum distance between accumulated stroke points.
    pub min_point_spacing_px: f64,
    /// Eraser reach, independent of stroke width.
    pub eraser_tolerance_px: f64,
    /// Grab radius of a token for select and erase.
    pub element_hit_radius_px: f64,
    /// Stroke colour for new paths.
    pub default_stroke_color: SerializableColor,
    /// Stroke width for new paths.
    pub default_stroke_width: f64,
    /// Fill opacity for new zones.
    pub zone_fill_opacity: f64,
    /// Normalized offset applied to duplicated elements.
    pub duplicate_offset: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            surface_size: Size::new(360.0, 540.0),
            min_point_spacing_px: 4.0,
            eraser_tolerance_px: 30.0,
            element_hit_radius_px: 22.0,
            default_stroke_color: SerializableColor::white(),
            default_stroke_width: 3.0,
            zone_fill_opacity: 0.25,
            duplicate_offset: 0.04,
        }
    }
}

impl BoardConfig {
    /// The surface described by this configuration.
    pub fn surface(&self) -> Surface {
        Surface::new(self.surface_size)
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> BoardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
