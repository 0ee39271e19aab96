//! Procedural animated scenes.
//!
//! A [`Scene`] is built from a static template table keyed by activity
//! category, actor mode and an optional equipment key. Scenes are plain data:
//! they are never edited after creation, only regenerated.

mod table;

pub use table::{ActorSpec, MotionSpec, Template, templates};

use crate::error::{BoardError, BoardResult};
use crate::model::{Element, ElementKind};
use crate::surface::{Half, confining_half};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Training activity the scene rehearses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    BallControl,
    Passing,
    Shooting,
    FirstTouch,
    Conditioning,
    Goalkeeping,
    Defending,
    SetPieces,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::BallControl,
        Category::Passing,
        Category::Shooting,
        Category::FirstTouch,
        Category::Conditioning,
        Category::Goalkeeping,
        Category::Defending,
        Category::SetPieces,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::BallControl => "ball-control",
            Category::Passing => "passing",
            Category::Shooting => "shooting",
            Category::FirstTouch => "first-touch",
            Category::Conditioning => "conditioning",
            Category::Goalkeeping => "goalkeeping",
            Category::Defending => "defending",
            Category::SetPieces => "set-pieces",
        }
    }

    /// Parse a category name, ignoring case, spaces, dashes and underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = name_key(name);
        Self::ALL
            .into_iter()
            .find(|c| name_key(c.name()) == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many actors take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorMode {
    Solo,
    Partner,
    Team,
}

impl ActorMode {
    pub const ALL: [ActorMode; 3] = [ActorMode::Solo, ActorMode::Partner, ActorMode::Team];

    pub fn name(self) -> &'static str {
        match self {
            ActorMode::Solo => "solo",
            ActorMode::Partner => "partner",
            ActorMode::Team => "team",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let key = name_key(name);
        Self::ALL.into_iter().find(|m| m.name() == key)
    }
}

impl fmt::Display for ActorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn name_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Equipment the user has available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Equipment {
    Cones,
    Flags,
    Ladder,
    Mannequin,
    MiniGoal,
    Goal,
}

/// Set of available equipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentSet(BTreeSet<Equipment>);

impl EquipmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item: Equipment) -> Self {
        self.0.insert(item);
        self
    }

    pub fn insert(&mut self, item: Equipment) -> bool {
        self.0.insert(item)
    }

    pub fn contains(&self, item: Equipment) -> bool {
        self.0.contains(&item)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Equipment> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Equipment> for EquipmentSet {
    fn from_iter<I: IntoIterator<Item = Equipment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What happens when a motion reaches its last waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatBehavior {
    /// Jump back to the first waypoint.
    Loop,
    /// Run the waypoints backwards, doubling the period.
    PingPong,
}

/// How positions between waypoints are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interpolation {
    Linear,
    /// Quadratic smoothing through the waypoints.
    Curved,
}

/// Timed movement along waypoints. Always has at least two waypoints and a
/// positive duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionPath {
    pub waypoints: Vec<Point>,
    pub duration_seconds: f64,
    pub repeat: RepeatBehavior,
    pub interpolation: Interpolation,
}

impl MotionPath {
    /// Time after which the motion repeats exactly.
    pub fn period(&self) -> f64 {
        match self.repeat {
            RepeatBehavior::Loop => self.duration_seconds,
            RepeatBehavior::PingPong => 2.0 * self.duration_seconds,
        }
    }
}

/// One element of a scene and how it moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneActor {
    pub element: Element,
    /// `None` keeps the element at its start position.
    pub motion: Option<MotionPath>,
}

/// A generated, looping animated diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub category: Category,
    pub actor_mode: ActorMode,
    /// Equipment that selected an alternative template, if any.
    pub equipment_key: Option<Equipment>,
    pub actors: Vec<SceneActor>,
    pub loop_duration_seconds: f64,
    pub show_half_field: bool,
}

impl Scene {
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.actors.iter().map(|a| &a.element)
    }

    /// Actors of one kind, in scene order.
    pub fn actors_of(&self, kind: ElementKind) -> impl Iterator<Item = &SceneActor> {
        self.actors.iter().filter(move |a| a.element.kind == kind)
    }

    /// Every start position and waypoint in the scene.
    pub fn all_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.actors.iter().flat_map(|a| {
            std::iter::once(a.element.position())
                .chain(a.motion.iter().flat_map(|m| m.waypoints.iter().copied()))
        })
    }

    /// The half all geometry is confined to, when `show_half_field` is set.
    pub fn half(&self) -> Option<Half> {
        confining_half(self.all_points())
    }
}

/// Build the scene for a category, mode and available equipment.
///
/// Equipment-keyed templates are tried first, in table order; otherwise the
/// pair's default template is used.
pub fn build_scene(
    category: Category,
    actor_mode: ActorMode,
    equipment: &EquipmentSet,
) -> BoardResult<Scene> {
    let rows = templates();
    let candidates = || {
        rows
            .iter()
            .enumerate()
            .filter(|(_, t)| t.category == category && t.mode == actor_mode)
    };
    let chosen = candidates()
        .find(|(_, t)| t.equipment.is_some_and(|e| equipment.contains(e)))
        .or_else(|| candidates().find(|(_, t)| t.equipment.is_none()));

    let Some((index, template)) = chosen else {
        log::warn!("No template for {} / {}", category, actor_mode);
        return Err(BoardError::UnknownTemplate {
            category: category.to_string(),
            mode: actor_mode.to_string(),
        });
    };

    let scene = template.instantiate(index);
    log::info!(
        "Built {} / {} scene ({} actors, {:.1}s loop)",
        category,
        actor_mode,
        scene.actors.len(),
        scene.loop_duration_seconds
    );
    Ok(scene)
}

/// Like [`build_scene`] but with category and mode given by name, such as
/// `"passing"`, `"set-pieces"` or `"partner"`.
pub fn build_scene_by_name(
    category: &str,
    actor_mode: &str,
    equipment: &EquipmentSet,
) -> BoardResult<Scene> {
    match (Category::from_name(category), ActorMode::from_name(actor_mode)) {
        (Some(c), Some(m)) => build_scene(c, m, equipment),
        _ => {
            log::warn!("Unrecognised scene request '{}' / '{}'", category, actor_mode);
            Err(BoardError::UnknownTemplate {
                category: category.to_string(),
                mode: actor_mode.to_string(),
            })
        }
    }
}

impl Template {
    /// Turn the static descriptor into a scene. Ids derive from the table
    /// index and actor position so repeated builds compare equal.
    fn instantiate(&self, index: usize) -> Scene {
        let actors: Vec<SceneActor> = self
            .actors
            .iter()
            .enumerate()
            .map(|(i, spec)| spec.to_actor(scene_element_id(index, i)))
            .collect();

        let loop_duration_seconds = actors
            .iter()
            .filter_map(|a| a.motion.as_ref())
            .map(|m| m.duration_seconds)
            .fold(0.0, f64::max);

        let mut scene = Scene {
            category: self.category,
            actor_mode: self.mode,
            equipment_key: self.equipment,
            actors,
            loop_duration_seconds,
            show_half_field: false,
        };
        scene.show_half_field = scene.half().is_some();
        scene
    }
}

fn scene_element_id(template: usize, actor: usize) -> Uuid {
    Uuid::from_u128(((template as u128 + 1) << 32) | (actor as u128 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(Category::from_name("set-pieces"), Some(Category::SetPieces));
        assert_eq!(Category::from_name("Ball Control"), Some(Category::BallControl));
        assert_eq!(Category::from_name("first_touch"), Some(Category::FirstTouch));
        assert_eq!(Category::from_name("tennis"), None);
        assert_eq!(ActorMode::from_name("PARTNER"), Some(ActorMode::Partner));
        assert_eq!(ActorMode::from_name("duo"), None);
    }

    #[test]
    fn test_unknown_names() {
        let err = build_scene_by_name("tennis", "solo", &EquipmentSet::new()).unwrap_err();
        assert_eq!(
            err,
            BoardError::UnknownTemplate {
                category: "tennis".into(),
                mode: "solo".into()
            }
        );
        assert!(build_scene_by_name("passing", "crowd", &EquipmentSet::new()).is_err());
    }

    #[test]
    fn test_equipment_selects_alternative() {
        let plain =
            build_scene(Category::Conditioning, ActorMode::Solo, &EquipmentSet::new()).unwrap();
        assert_eq!(plain.equipment_key, None);
        assert!(plain.actors_of(ElementKind::Ladder).next().is_none());

        let kit = EquipmentSet::new().with(Equipment::Ladder);
        let ladder = build_scene(Category::Conditioning, ActorMode::Solo, &kit).unwrap();
        assert_eq!(ladder.equipment_key, Some(Equipment::Ladder));
        assert_eq!(ladder.actors_of(ElementKind::Ladder).count(), 1);
    }

    #[test]
    fn test_unrelated_equipment_is_ignored() {
        let kit = EquipmentSet::new().with(Equipment::Ladder);
        let scene = build_scene(Category::Passing, ActorMode::Partner, &kit).unwrap();
        assert_eq!(scene.equipment_key, None);
    }

    #[test]
    fn test_ids_are_unique_within_scene() {
        let scene =
            build_scene(Category::SetPieces, ActorMode::Team, &EquipmentSet::new()).unwrap();
        let ids: BTreeSet<_> = scene.elements().map(|e| e.id()).collect();
        assert_eq!(ids.len(), scene.actors.len());
    }

    #[test]
    fn test_ping_pong_period_doubles() {
        let motion = MotionPath {
            waypoints: vec![Point::ZERO, Point::new(1.0, 0.0)],
            duration_seconds: 1.5,
            repeat: RepeatBehavior::PingPong,
            interpolation: Interpolation::Linear,
        };
        assert_eq!(motion.period(), 3.0);
    }
}
