//! Placed tokens: players, goalkeeper, ball and equipment markers.

use super::{ElementId, SerializableColor};
use crate::geometry::clamp_to_surface;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a token represents. Renderers match on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    Player,
    Goalkeeper,
    Ball,
    Cone,
    Flag,
    Mannequin,
    Ladder,
    Goal,
    MiniGoal,
}

impl ElementKind {
    /// Kinds that carry a jersey number.
    pub fn is_numbered(self) -> bool {
        matches!(self, ElementKind::Player | ElementKind::Goalkeeper)
    }

    /// Kinds whose colour follows the team.
    pub fn uses_team_color(self) -> bool {
        matches!(
            self,
            ElementKind::Player | ElementKind::Goalkeeper | ElementKind::Flag
        )
    }

    /// Kinds placed with the equipment tool.
    pub fn is_equipment(self) -> bool {
        !matches!(
            self,
            ElementKind::Player | ElementKind::Goalkeeper | ElementKind::Ball
        )
    }

    /// Token footprint relative to a player token.
    pub fn size_factor(self) -> f64 {
        match self {
            ElementKind::Player | ElementKind::Goalkeeper => 1.0,
            ElementKind::Ball => 0.55,
            ElementKind::Cone => 0.6,
            ElementKind::Flag => 0.8,
            ElementKind::Mannequin => 1.0,
            ElementKind::Ladder => 1.8,
            ElementKind::Goal => 2.4,
            ElementKind::MiniGoal => 1.4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Player => "player",
            ElementKind::Goalkeeper => "goalkeeper",
            ElementKind::Ball => "ball",
            ElementKind::Cone => "cone",
            ElementKind::Flag => "flag",
            ElementKind::Mannequin => "mannequin",
            ElementKind::Ladder => "ladder",
            ElementKind::Goal => "goal",
            ElementKind::MiniGoal => "mini goal",
        }
    }
}

/// Team assignment for players, goalkeepers and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TeamColor {
    #[default]
    Home,
    Away,
    Neutral,
}

impl TeamColor {
    /// Display colour of the team.
    pub fn color(self) -> SerializableColor {
        match self {
            TeamColor::Home => SerializableColor::new(220, 38, 38, 255),
            TeamColor::Away => SerializableColor::new(37, 99, 235, 255),
            TeamColor::Neutral => SerializableColor::new(234, 179, 8, 255),
        }
    }

    /// Cycle to the next team.
    pub fn next(self) -> Self {
        match self {
            TeamColor::Home => TeamColor::Away,
            TeamColor::Away => TeamColor::Neutral,
            TeamColor::Neutral => TeamColor::Home,
        }
    }
}

/// A token placed on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    pub kind: ElementKind,
    /// Normalized position, always inside the clamp box.
    pub(crate) position: Point,
    #[serde(default)]
    pub team_color: TeamColor,
    /// Jersey number (1-11), players and goalkeepers only.
    #[serde(default)]
    pub number: Option<u8>,
    /// Visual rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Visual scale.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Paint order; higher paints on top.
    #[serde(default)]
    pub z_index: i32,
}

fn default_scale() -> f64 {
    1.0
}

impl Element {
    /// Create a new element at a normalized position (clamped).
    pub fn new(kind: ElementKind, position: Point) -> Self {
        Self::with_id(Uuid::new_v4(), kind, position)
    }

    /// Create an element with a caller-chosen identity.
    pub(crate) fn with_id(id: ElementId, kind: ElementKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position: clamp_to_surface(position),
            team_color: TeamColor::default(),
            number: None,
            rotation: 0.0,
            scale: 1.0,
            z_index: 0,
        }
    }

    pub fn with_team(mut self, team: TeamColor) -> Self {
        self.team_color = team;
        self
    }

    pub fn with_number(mut self, number: u8) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Move to a new normalized position; returns the clamped result.
    pub fn set_position(&mut self, position: Point) -> Point {
        self.position = clamp_to_surface(position);
        self.position
    }

    /// Give the element a fresh identity (used when duplicating).
    pub(crate) fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Fill colour used when drawing the token.
    pub fn fill_color(&self) -> SerializableColor {
        match self.kind {
            ElementKind::Player | ElementKind::Goalkeeper | ElementKind::Flag => {
                self.team_color.color()
            }
            ElementKind::Ball => SerializableColor::white(),
            ElementKind::Cone => SerializableColor::new(249, 115, 22, 255),
            ElementKind::Mannequin => SerializableColor::new(30, 41, 59, 255),
            ElementKind::Ladder => SerializableColor::new(250, 204, 21, 255),
            ElementKind::Goal | ElementKind::MiniGoal => SerializableColor::white(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CLAMP_MAX, CLAMP_MIN};

    #[test]
    fn test_new_element_is_clamped() {
        let e = Element::new(ElementKind::Cone, Point::new(-1.0, 2.0));
        assert_eq!(e.position(), Point::new(CLAMP_MIN, CLAMP_MAX));
        assert_eq!(e.scale, 1.0);
        assert_eq!(e.rotation, 0.0);
    }

    #[test]
    fn test_set_position_clamps() {
        let mut e = Element::new(ElementKind::Player, Point::new(0.5, 0.5));
        let p = e.set_position(Point::new(0.99, 0.01));
        assert_eq!(p, Point::new(CLAMP_MAX, CLAMP_MIN));
    }

    #[test]
    fn test_kind_flags() {
        assert!(ElementKind::Goalkeeper.is_numbered());
        assert!(!ElementKind::Ball.is_numbered());
        assert!(ElementKind::Flag.uses_team_color());
        assert!(ElementKind::Ladder.is_equipment());
        assert!(!ElementKind::Ball.is_equipment());
    }

    #[test]
    fn test_deserialize_defaults() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{ "id": "{id}", "kind": "Player", "position": {{ "x": 0.5, "y": 0.5 }} }}"#
        );
        let e: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(e.scale, 1.0);
        assert_eq!(e.team_color, TeamColor::Home);
        assert_eq!(e.number, None);
    }
}
