//! Annotated strokes: arrows, lines, curves, zones and runs.

use super::{PathId, SerializableColor};
use crate::config::BoardConfig;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of annotation a path represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathType {
    Line,
    Arrow,
    CurvedArrow,
    Zone,
    Freehand,
    DottedRun,
    PassLine,
}

impl PathType {
    /// Fewest points a committed path of this type may have.
    pub fn min_points(self) -> usize {
        match self {
            PathType::Zone => 3,
            _ => 2,
        }
    }

    /// Whether the path ends in an arrowhead.
    pub fn has_arrow_head(self) -> bool {
        matches!(
            self,
            PathType::Arrow | PathType::CurvedArrow | PathType::PassLine | PathType::DottedRun
        )
    }

    /// Closed, filled outline.
    pub fn is_closed(self) -> bool {
        self == PathType::Zone
    }

    /// Rendered through midpoint smoothing rather than straight segments.
    pub fn is_smoothed(self) -> bool {
        matches!(self, PathType::CurvedArrow | PathType::Freehand)
    }

    /// Dashed unless the caller says otherwise.
    pub fn dashed_by_default(self) -> bool {
        self == PathType::PassLine
    }
}

/// Style attributes supplied when committing a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathAttrs {
    pub path_type: PathType,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    pub is_dashed: bool,
    /// Only meaningful for zones; ignored for open paths.
    pub fill_opacity: f64,
}

impl PathAttrs {
    pub fn new(path_type: PathType) -> Self {
        Self::from_config(path_type, &BoardConfig::default())
    }

    /// Attributes for `path_type` using the configured default styles.
    pub fn from_config(path_type: PathType, config: &BoardConfig) -> Self {
        Self {
            path_type,
            stroke_color: config.default_stroke_color,
            stroke_width: config.default_stroke_width,
            is_dashed: path_type.dashed_by_default(),
            fill_opacity: config.zone_fill_opacity,
        }
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.stroke_color = color;
        self
    }

    pub fn with_dashed(mut self, dashed: bool) -> Self {
        self.is_dashed = dashed;
        self
    }
}

/// A committed stroke. Its points never change after commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingPath {
    pub(crate) id: PathId,
    pub path_type: PathType,
    pub(crate) points: Vec<Point>,
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    #[serde(default)]
    pub is_dashed: bool,
    pub has_arrow_head: bool,
    #[serde(default)]
    pub fill_opacity: f64,
    #[serde(default)]
    pub z_index: i32,
}

impl DrawingPath {
    /// Build a path from already-validated points.
    pub(crate) fn from_attrs(points: Vec<Point>, attrs: &PathAttrs, z_index: i32) -> Self {
        let fill_opacity = if attrs.path_type.is_closed() {
            attrs.fill_opacity.max(f64::EPSILON)
        } else {
            0.0
        };
        Self {
            id: Uuid::new_v4(),
            path_type: attrs.path_type,
            points,
            stroke_color: attrs.stroke_color,
            stroke_width: attrs.stroke_width,
            is_dashed: attrs.is_dashed,
            has_arrow_head: attrs.path_type.has_arrow_head(),
            fill_opacity,
            z_index,
        }
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_points() {
        assert_eq!(PathType::Zone.min_points(), 3);
        assert_eq!(PathType::Freehand.min_points(), 2);
    }

    #[test]
    fn test_arrow_head_flags() {
        for t in [PathType::Arrow, PathType::CurvedArrow, PathType::PassLine] {
            assert!(t.has_arrow_head());
        }
        for t in [PathType::Line, PathType::Zone, PathType::Freehand] {
            assert!(!t.has_arrow_head());
        }
    }

    #[test]
    fn test_fill_only_for_zones() {
        let pts = vec![Point::new(0.1, 0.1), Point::new(0.2, 0.2), Point::new(0.1, 0.3)];
        let zone = DrawingPath::from_attrs(pts.clone(), &PathAttrs::new(PathType::Zone), 0);
        assert!(zone.fill_opacity > 0.0);
        let line = DrawingPath::from_attrs(pts, &PathAttrs::new(PathType::Line), 0);
        assert_eq!(line.fill_opacity, 0.0);
        assert_eq!(line.stroke_width, 3.0);
    }

    #[test]
    fn test_pass_line_dashed_by_default() {
        assert!(PathAttrs::new(PathType::PassLine).is_dashed);
        assert!(!PathAttrs::new(PathType::Arrow).is_dashed);
    }
}
