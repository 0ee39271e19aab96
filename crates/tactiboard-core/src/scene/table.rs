//! Hand-authored scene descriptors.
//!
//! The surface is portrait with goals at the top and bottom edges. Templates
//! that only use one end keep every coordinate in that half.

use super::{ActorMode, Category, Equipment, Interpolation, MotionPath, RepeatBehavior, SceneActor};
use crate::model::{BALL_Z_BIAS, Element, ElementId, ElementKind, TeamColor};
use kurbo::Point;

use ActorMode::{Partner, Solo, Team};
use Category::*;
use ElementKind::{Cone, Flag, Goal, Ladder, Mannequin, MiniGoal};

/// Static description of one moving element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSpec {
    pub waypoints: &'static [(f64, f64)],
    pub duration_seconds: f64,
    pub repeat: RepeatBehavior,
    pub interpolation: Interpolation,
}

/// Static description of one scene element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorSpec {
    pub kind: ElementKind,
    pub team: TeamColor,
    pub number: Option<u8>,
    pub start: (f64, f64),
    pub rotation: f64,
    pub motion: Option<MotionSpec>,
}

/// One row of the template table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Template {
    pub category: Category,
    pub mode: ActorMode,
    /// `None` for the pair's default template.
    pub equipment: Option<Equipment>,
    pub actors: &'static [ActorSpec],
}

const fn actor(
    kind: ElementKind,
    team: TeamColor,
    number: Option<u8>,
    x: f64,
    y: f64,
) -> ActorSpec {
    ActorSpec {
        kind,
        team,
        number,
        start: (x, y),
        rotation: 0.0,
        motion: None,
    }
}

const fn home(number: u8, x: f64, y: f64) -> ActorSpec {
    actor(ElementKind::Player, TeamColor::Home, Some(number), x, y)
}

const fn away(number: u8, x: f64, y: f64) -> ActorSpec {
    actor(ElementKind::Player, TeamColor::Away, Some(number), x, y)
}

const fn keeper(x: f64, y: f64) -> ActorSpec {
    actor(ElementKind::Goalkeeper, TeamColor::Neutral, Some(1), x, y)
}

const fn ball(x: f64, y: f64) -> ActorSpec {
    actor(ElementKind::Ball, TeamColor::Home, None, x, y)
}

const fn gear(kind: ElementKind, x: f64, y: f64) -> ActorSpec {
    actor(kind, TeamColor::Neutral, None, x, y)
}

impl ActorSpec {
    const fn rotated(self, rotation: f64) -> Self {
        ActorSpec { rotation, ..self }
    }

    const fn moving(
        self,
        waypoints: &'static [(f64, f64)],
        duration_seconds: f64,
        repeat: RepeatBehavior,
        interpolation: Interpolation,
    ) -> Self {
        ActorSpec {
            motion: Some(MotionSpec {
                waypoints,
                duration_seconds,
                repeat,
                interpolation,
            }),
            ..self
        }
    }

    /// Straight loop.
    const fn loops(self, waypoints: &'static [(f64, f64)], seconds: f64) -> Self {
        self.moving(waypoints, seconds, RepeatBehavior::Loop, Interpolation::Linear)
    }

    /// Smoothed loop.
    const fn curves(self, waypoints: &'static [(f64, f64)], seconds: f64) -> Self {
        self.moving(waypoints, seconds, RepeatBehavior::Loop, Interpolation::Curved)
    }

    /// Straight back and forth.
    const fn shuttles(self, waypoints: &'static [(f64, f64)], seconds: f64) -> Self {
        self.moving(waypoints, seconds, RepeatBehavior::PingPong, Interpolation::Linear)
    }

    /// Smoothed back and forth.
    const fn sways(self, waypoints: &'static [(f64, f64)], seconds: f64) -> Self {
        self.moving(waypoints, seconds, RepeatBehavior::PingPong, Interpolation::Curved)
    }

    pub(super) fn to_actor(&self, id: ElementId) -> SceneActor {
        let (x, y) = self.start;
        let mut element = Element::with_id(id, self.kind, Point::new(x, y)).with_team(self.team);
        element.number = self.number;
        element.rotation = self.rotation;
        element.z_index = match self.kind {
            ElementKind::Ball => BALL_Z_BIAS,
            _ => 0,
        };
        let motion = self.motion.map(|m| MotionPath {
            waypoints: m.waypoints.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            duration_seconds: m.duration_seconds,
            repeat: m.repeat,
            interpolation: m.interpolation,
        });
        SceneActor { element, motion }
    }
}

macro_rules! template {
    ($category:expr, $mode:expr, [$($actor:expr),* $(,)?]) => {
        Template {
            category: $category,
            mode: $mode,
            equipment: None,
            actors: &[$($actor),*],
        }
    };
    ($category:expr, $mode:expr, $kit:expr, [$($actor:expr),* $(,)?]) => {
        Template {
            category: $category,
            mode: $mode,
            equipment: Some($kit),
            actors: &[$($actor),*],
        }
    };
}

/// The full template table. Every category and mode pair has a default row.
pub fn templates() -> &'static [Template] {
    TEMPLATES
}

static TEMPLATES: &[Template] = &[
    // Ball control
    template!(BallControl, Solo, Equipment::Cones, [
        gear(Cone, 0.5, 0.85),
        gear(Cone, 0.5, 0.75),
        gear(Cone, 0.5, 0.65),
        gear(Cone, 0.5, 0.55),
        home(7, 0.5, 0.92).sways(
            &[(0.5, 0.92), (0.4, 0.8), (0.6, 0.7), (0.4, 0.6), (0.5, 0.52)],
            5.0,
        ),
        ball(0.5, 0.9).sways(
            &[(0.5, 0.9), (0.42, 0.78), (0.58, 0.68), (0.42, 0.58), (0.5, 0.5)],
            5.0,
        ),
    ]),
    template!(BallControl, Solo, [
        home(7, 0.5, 0.75).curves(
            &[(0.5, 0.75), (0.65, 0.65), (0.5, 0.55), (0.35, 0.65), (0.5, 0.75)],
            4.0,
        ),
        ball(0.5, 0.72).curves(
            &[(0.5, 0.72), (0.63, 0.63), (0.5, 0.52), (0.37, 0.63), (0.5, 0.72)],
            4.0,
        ),
    ]),
    template!(BallControl, Partner, [
        home(7, 0.5, 0.6).shuttles(&[(0.45, 0.6), (0.55, 0.6)], 3.0),
        home(8, 0.5, 0.85).shuttles(&[(0.55, 0.85), (0.45, 0.85)], 3.0),
        ball(0.5, 0.63).sways(&[(0.48, 0.63), (0.52, 0.82)], 1.5),
    ]),
    template!(BallControl, Team, [
        gear(Cone, 0.3, 0.35),
        gear(Cone, 0.7, 0.35),
        gear(Cone, 0.7, 0.65),
        gear(Cone, 0.3, 0.65),
        home(4, 0.3, 0.38).curves(&[(0.3, 0.38), (0.4, 0.45), (0.3, 0.52), (0.3, 0.38)], 3.0),
        home(6, 0.7, 0.38).curves(&[(0.7, 0.38), (0.6, 0.45), (0.7, 0.52), (0.7, 0.38)], 3.0),
        home(8, 0.7, 0.62).curves(&[(0.7, 0.62), (0.6, 0.55), (0.7, 0.48), (0.7, 0.62)], 3.0),
        home(10, 0.3, 0.62).curves(&[(0.3, 0.62), (0.4, 0.55), (0.3, 0.48), (0.3, 0.62)], 3.0),
        ball(0.33, 0.4).loops(
            &[(0.33, 0.4), (0.67, 0.4), (0.67, 0.6), (0.33, 0.6), (0.33, 0.4)],
            4.0,
        ),
    ]),
    // Passing
    template!(Passing, Solo, [
        gear(Cone, 0.45, 0.55),
        gear(Cone, 0.55, 0.55),
        home(6, 0.5, 0.8).shuttles(&[(0.45, 0.8), (0.55, 0.8)], 3.0),
        ball(0.5, 0.77).shuttles(&[(0.5, 0.77), (0.5, 0.57)], 1.5),
    ]),
    template!(Passing, Partner, [
        home(6, 0.5, 0.6).shuttles(&[(0.47, 0.6), (0.53, 0.6)], 2.0),
        home(8, 0.5, 0.85).shuttles(&[(0.53, 0.85), (0.47, 0.85)], 2.0),
        ball(0.5, 0.62).shuttles(&[(0.5, 0.62), (0.5, 0.83)], 2.0),
    ]),
    template!(Passing, Team, [
        home(4, 0.3, 0.6).shuttles(&[(0.3, 0.6), (0.33, 0.63)], 1.5),
        home(6, 0.7, 0.6).shuttles(&[(0.7, 0.6), (0.67, 0.63)], 1.5),
        home(8, 0.5, 0.9).shuttles(&[(0.5, 0.9), (0.5, 0.86)], 1.5),
        ball(0.32, 0.62).loops(&[(0.32, 0.62), (0.68, 0.62), (0.5, 0.87), (0.32, 0.62)], 3.0),
    ]),
    // Shooting
    template!(Shooting, Solo, Equipment::MiniGoal, [
        gear(MiniGoal, 0.5, 0.1),
        gear(Cone, 0.35, 0.35),
        gear(Cone, 0.65, 0.35),
        home(9, 0.5, 0.45).curves(&[(0.5, 0.45), (0.4, 0.32), (0.5, 0.22)], 3.0),
        ball(0.5, 0.42).curves(&[(0.5, 0.42), (0.42, 0.3), (0.5, 0.2), (0.5, 0.1)], 3.0),
    ]),
    template!(Shooting, Solo, [
        gear(Goal, 0.5, 0.04),
        home(9, 0.5, 0.45).loops(&[(0.5, 0.45), (0.5, 0.25)], 3.0),
        ball(0.5, 0.42).loops(&[(0.5, 0.42), (0.5, 0.22), (0.45, 0.06)], 3.0),
    ]),
    template!(Shooting, Partner, [
        gear(Goal, 0.5, 0.04),
        home(7, 0.75, 0.35).shuttles(&[(0.75, 0.35), (0.72, 0.33)], 1.5),
        home(9, 0.5, 0.45).loops(&[(0.5, 0.45), (0.5, 0.25)], 3.0),
        ball(0.73, 0.33).loops(&[(0.73, 0.33), (0.52, 0.26), (0.45, 0.06)], 3.0),
    ]),
    template!(Shooting, Team, [
        gear(Goal, 0.5, 0.04),
        keeper(0.5, 0.08).shuttles(&[(0.42, 0.08), (0.58, 0.08)], 2.0),
        home(7, 0.2, 0.3).loops(&[(0.2, 0.3), (0.25, 0.22)], 4.0),
        home(9, 0.5, 0.45).loops(&[(0.5, 0.45), (0.5, 0.25)], 4.0),
        home(11, 0.8, 0.3).loops(&[(0.8, 0.3), (0.75, 0.22)], 4.0),
        ball(0.22, 0.28).loops(
            &[(0.22, 0.28), (0.5, 0.4), (0.76, 0.24), (0.52, 0.26), (0.55, 0.06)],
            4.0,
        ),
    ]),
    // First touch
    template!(FirstTouch, Solo, [
        gear(Flag, 0.5, 0.55),
        home(8, 0.5, 0.8).shuttles(&[(0.47, 0.8), (0.53, 0.8)], 2.0),
        ball(0.5, 0.77).sways(&[(0.4, 0.57), (0.5, 0.77)], 2.0),
    ]),
    template!(FirstTouch, Partner, [
        home(4, 0.5, 0.58).shuttles(&[(0.5, 0.58), (0.5, 0.6)], 2.5),
        home(8, 0.5, 0.88).sways(&[(0.4, 0.88), (0.6, 0.86)], 2.5),
        ball(0.5, 0.6).sways(&[(0.5, 0.6), (0.42, 0.75), (0.58, 0.85)], 2.5),
    ]),
    template!(FirstTouch, Team, [
        home(2, 0.5, 0.3).shuttles(&[(0.5, 0.3), (0.5, 0.33)], 2.0),
        home(4, 0.75, 0.5).shuttles(&[(0.75, 0.5), (0.72, 0.5)], 2.0),
        home(6, 0.5, 0.7).shuttles(&[(0.5, 0.7), (0.5, 0.67)], 2.0),
        home(8, 0.25, 0.5).shuttles(&[(0.25, 0.5), (0.28, 0.5)], 2.0),
        ball(0.5, 0.33).curves(
            &[(0.5, 0.33), (0.72, 0.5), (0.5, 0.67), (0.28, 0.5), (0.5, 0.33)],
            4.0,
        ),
    ]),
    // Conditioning
    template!(Conditioning, Solo, Equipment::Ladder, [
        gear(Ladder, 0.5, 0.7).rotated(90.0),
        gear(Cone, 0.6, 0.6),
        gear(Cone, 0.6, 0.85),
        home(10, 0.5, 0.88).loops(
            &[(0.5, 0.88), (0.5, 0.55), (0.6, 0.58), (0.6, 0.85), (0.5, 0.88)],
            5.0,
        ),
    ]),
    template!(Conditioning, Solo, [
        gear(Cone, 0.3, 0.7),
        gear(Cone, 0.5, 0.7),
        gear(Cone, 0.7, 0.7),
        home(10, 0.3, 0.72).shuttles(&[(0.3, 0.72), (0.5, 0.72), (0.7, 0.72)], 4.0),
    ]),
    template!(Conditioning, Partner, [
        gear(Cone, 0.4, 0.55),
        gear(Cone, 0.6, 0.55),
        gear(Cone, 0.4, 0.9),
        gear(Cone, 0.6, 0.9),
        home(10, 0.4, 0.9).shuttles(&[(0.4, 0.9), (0.4, 0.55)], 3.0),
        away(10, 0.6, 0.9).shuttles(&[(0.6, 0.9), (0.6, 0.55)], 3.2),
    ]),
    template!(Conditioning, Team, [
        gear(Cone, 0.2, 0.2),
        gear(Cone, 0.8, 0.2),
        gear(Cone, 0.8, 0.8),
        gear(Cone, 0.2, 0.8),
        home(2, 0.2, 0.2).loops(&[(0.2, 0.2), (0.8, 0.2), (0.8, 0.8), (0.2, 0.8), (0.2, 0.2)], 8.0),
        home(3, 0.8, 0.2).loops(&[(0.8, 0.2), (0.8, 0.8), (0.2, 0.8), (0.2, 0.2), (0.8, 0.2)], 8.0),
        home(4, 0.8, 0.8).loops(&[(0.8, 0.8), (0.2, 0.8), (0.2, 0.2), (0.8, 0.2), (0.8, 0.8)], 8.0),
        home(5, 0.2, 0.8).loops(&[(0.2, 0.8), (0.2, 0.2), (0.8, 0.2), (0.8, 0.8), (0.2, 0.8)], 8.0),
    ]),
    // Goalkeeping
    template!(Goalkeeping, Solo, [
        gear(Goal, 0.5, 0.04),
        keeper(0.5, 0.1).shuttles(&[(0.4, 0.1), (0.6, 0.1)], 2.0),
        ball(0.5, 0.3),
    ]),
    template!(Goalkeeping, Partner, [
        gear(Goal, 0.5, 0.04),
        keeper(0.5, 0.1).sways(&[(0.45, 0.1), (0.55, 0.12)], 2.0),
        home(9, 0.5, 0.35).shuttles(&[(0.5, 0.35), (0.5, 0.33)], 2.0),
        ball(0.5, 0.32).shuttles(&[(0.5, 0.32), (0.53, 0.12)], 2.0),
    ]),
    template!(Goalkeeping, Team, [
        gear(Goal, 0.5, 0.04),
        keeper(0.5, 0.1).shuttles(&[(0.35, 0.1), (0.65, 0.1)], 3.0),
        home(7, 0.25, 0.3),
        home(9, 0.5, 0.38),
        home(11, 0.75, 0.3),
        ball(0.27, 0.28).loops(
            &[(0.27, 0.28), (0.38, 0.08), (0.5, 0.36), (0.5, 0.08), (0.73, 0.28), (0.62, 0.08)],
            6.0,
        ),
    ]),
    // Defending
    template!(Defending, Solo, Equipment::Mannequin, [
        gear(Mannequin, 0.5, 0.3),
        home(5, 0.5, 0.4).sways(&[(0.4, 0.38), (0.5, 0.42), (0.6, 0.38)], 3.0),
    ]),
    template!(Defending, Solo, [
        gear(Cone, 0.35, 0.2),
        gear(Cone, 0.65, 0.2),
        gear(Cone, 0.35, 0.45),
        gear(Cone, 0.65, 0.45),
        home(5, 0.5, 0.4).sways(&[(0.5, 0.4), (0.42, 0.32), (0.55, 0.25)], 3.0),
    ]),
    template!(Defending, Partner, [
        home(9, 0.5, 0.45).sways(&[(0.5, 0.45), (0.4, 0.35), (0.55, 0.25)], 3.0),
        away(5, 0.5, 0.3).sways(&[(0.5, 0.3), (0.43, 0.25), (0.53, 0.18)], 3.0),
        ball(0.5, 0.42).sways(&[(0.5, 0.42), (0.41, 0.32), (0.55, 0.22)], 3.0),
    ]),
    template!(Defending, Team, [
        gear(Goal, 0.5, 0.04),
        home(9, 0.35, 0.45).curves(&[(0.35, 0.45), (0.4, 0.3), (0.35, 0.45)], 4.0),
        home(11, 0.65, 0.45).curves(&[(0.65, 0.45), (0.6, 0.3), (0.65, 0.45)], 4.0),
        away(4, 0.4, 0.25).curves(&[(0.4, 0.25), (0.42, 0.2), (0.4, 0.25)], 4.0),
        away(5, 0.6, 0.25).curves(&[(0.6, 0.25), (0.58, 0.2), (0.6, 0.25)], 4.0),
        ball(0.37, 0.42).curves(&[(0.37, 0.42), (0.62, 0.42), (0.58, 0.3), (0.37, 0.42)], 4.0),
    ]),
    // Set pieces
    template!(SetPieces, Solo, [
        gear(Goal, 0.5, 0.04),
        gear(Mannequin, 0.45, 0.22),
        gear(Mannequin, 0.5, 0.22),
        gear(Mannequin, 0.55, 0.22),
        home(10, 0.5, 0.38).loops(&[(0.5, 0.38), (0.5, 0.36)], 2.5),
        ball(0.5, 0.34).curves(&[(0.5, 0.34), (0.64, 0.2), (0.57, 0.06)], 2.5),
    ]),
    template!(SetPieces, Partner, [
        gear(Goal, 0.5, 0.04),
        home(7, 0.95, 0.05),
        home(9, 0.6, 0.3).loops(&[(0.6, 0.3), (0.52, 0.14)], 3.0),
        ball(0.93, 0.06).curves(&[(0.93, 0.06), (0.7, 0.2), (0.52, 0.14)], 3.0),
    ]),
    template!(SetPieces, Team, [
        gear(Goal, 0.5, 0.04),
        keeper(0.5, 0.08).shuttles(&[(0.5, 0.08), (0.55, 0.1)], 3.0),
        home(7, 0.95, 0.05),
        home(9, 0.55, 0.3).loops(&[(0.55, 0.3), (0.48, 0.13)], 3.0),
        home(5, 0.4, 0.32).loops(&[(0.4, 0.32), (0.42, 0.16)], 3.0),
        away(4, 0.5, 0.2).loops(&[(0.5, 0.2), (0.47, 0.15)], 3.0),
        ball(0.93, 0.06).curves(&[(0.93, 0.06), (0.65, 0.18), (0.48, 0.14)], 3.0),
    ]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pair_has_default() {
        for category in Category::ALL {
            for mode in ActorMode::ALL {
                let defaults = TEMPLATES
                    .iter()
                    .filter(|t| t.category == category && t.mode == mode && t.equipment.is_none())
                    .count();
                assert_eq!(defaults, 1, "{category} / {mode}");
            }
        }
    }

    #[test]
    fn test_motions_are_well_formed() {
        for t in TEMPLATES {
            for a in t.actors {
                let (x, y) = a.start;
                assert!((0.03..=0.97).contains(&x) && (0.03..=0.97).contains(&y));
                if let Some(m) = a.motion {
                    assert!(m.waypoints.len() >= 2, "{} / {}", t.category, t.mode);
                    assert!(m.duration_seconds > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_ball_paints_on_top() {
        let actor = ball(0.5, 0.5).to_actor(ElementId::nil());
        assert_eq!(actor.element.z_index, BALL_Z_BIAS);
        assert!(actor.motion.is_none());
    }
}
