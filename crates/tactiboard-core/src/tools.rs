//! Tool system for the board.

use crate::model::{ElementKind, PathType};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Equipment that can be placed with the equipment tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EquipmentKind {
    #[default]
    Cone,
    Flag,
    Mannequin,
    Ladder,
    Goal,
    MiniGoal,
}

impl From<EquipmentKind> for ElementKind {
    fn from(kind: EquipmentKind) -> Self {
        match kind {
            EquipmentKind::Cone => ElementKind::Cone,
            EquipmentKind::Flag => ElementKind::Flag,
            EquipmentKind::Mannequin => ElementKind::Mannequin,
            EquipmentKind::Ladder => ElementKind::Ladder,
            EquipmentKind::Goal => ElementKind::Goal,
            EquipmentKind::MiniGoal => ElementKind::MiniGoal,
        }
    }
}

/// Available tools. The tool decides how a gesture is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Select,
    PlacePlayer,
    PlaceGoalkeeper,
    PlaceBall,
    PlaceEquipment(EquipmentKind),
    Arrow,
    Line,
    CurvedArrow,
    Zone,
    Freehand,
    DottedRun,
    PassLine,
    Eraser,
}

impl ToolKind {
    /// Element placed by this tool, if it is a place tool.
    pub fn placed_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::PlacePlayer => Some(ElementKind::Player),
            ToolKind::PlaceGoalkeeper => Some(ElementKind::Goalkeeper),
            ToolKind::PlaceBall => Some(ElementKind::Ball),
            ToolKind::PlaceEquipment(kind) => Some(kind.into()),
            _ => None,
        }
    }

    /// Path drawn by this tool, if it is a draw tool.
    pub fn path_type(self) -> Option<PathType> {
        match self {
            ToolKind::Arrow => Some(PathType::Arrow),
            ToolKind::Line => Some(PathType::Line),
            ToolKind::CurvedArrow => Some(PathType::CurvedArrow),
            ToolKind::Zone => Some(PathType::Zone),
            ToolKind::Freehand => Some(PathType::Freehand),
            ToolKind::DottedRun => Some(PathType::DottedRun),
            ToolKind::PassLine => Some(PathType::PassLine),
            _ => None,
        }
    }
}

/// Uncommitted points of a stroke in progress.
///
/// Points closer than the spacing threshold to the last accepted point are
/// dropped so high-frequency pointer input does not produce dense polylines.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeBuffer {
    path_type: PathType,
    points: Vec<Point>,
}

impl StrokeBuffer {
    /// Start a buffer seeded with the pointer-down position.
    pub fn begin(path_type: PathType, start: Point) -> Self {
        Self {
            path_type,
            points: vec![start],
        }
    }

    /// Append `point` if it is farther than `min_spacing` from the last point.
    ///
    /// `distance` measures two normalized points; callers pass a pixel-space
    /// metric so the threshold follows the on-screen size.
    pub fn push(
        &mut self,
        point: Point,
        min_spacing: f64,
        distance: impl Fn(Point, Point) -> f64,
    ) -> bool {
        match self.points.last() {
            Some(&last) if distance(last, point) <= min_spacing => false,
            _ => {
                self.points.push(point);
                true
            }
        }
    }

    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the buffer can be committed as a path.
    pub fn is_committable(&self) -> bool {
        self.points.len() >= self.path_type.min_points()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}
