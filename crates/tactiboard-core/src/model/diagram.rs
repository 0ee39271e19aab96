//! The diagram aggregate and its invariants.

use super::{DrawingPath, Element, ElementId, ElementKind, PathAttrs, PathId, TeamColor};
use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::geometry::{
    flatten_segments, point_in_polygon, point_to_polyline_dist, smooth_polyline,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Highest jersey number before the counter wraps.
pub const MAX_JERSEY_NUMBER: u8 = 11;

/// Z-index bias that keeps a new ball above markers placed around it.
pub(crate) const BALL_Z_BIAS: i32 = 100;

/// Samples per curve when hit-testing smoothed paths.
const HIT_CURVE_STEPS: usize = 16;

/// Plain serializable state handed to and from external storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    pub elements: Vec<Element>,
    pub paths: Vec<DrawingPath>,
}

impl DiagramSnapshot {
    /// Serialize the snapshot to JSON.
    pub fn to_json(&self) -> BoardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a snapshot from JSON.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Something hit under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Element(ElementId),
    Path(PathId),
}

/// A diagram item in paint order.
#[derive(Debug, Clone, Copy)]
pub enum DiagramItem<'a> {
    Element(&'a Element),
    Path(&'a DrawingPath),
}

impl DiagramItem<'_> {
    pub fn z_index(&self) -> i32 {
        match self {
            DiagramItem::Element(e) => e.z_index,
            DiagramItem::Path(p) => p.z_index,
        }
    }
}

/// Elements and paths of one editing session.
///
/// Both collections are kept in commit order; paint order is derived from
/// `z_index` on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    elements: Vec<Element>,
    paths: Vec<DrawingPath>,
    next_number: u8,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            paths: Vec::new(),
            next_number: 1,
        }
    }

    /// Rebuild a diagram from a stored snapshot.
    ///
    /// Positions are re-clamped and the numbering counter is derived from the
    /// numbers already present. Paths below their minimum point count are
    /// rejected.
    pub fn from_snapshot(snapshot: DiagramSnapshot) -> BoardResult<Self> {
        for path in &snapshot.paths {
            let required = path.path_type.min_points();
            if path.points.len() < required {
                return Err(BoardError::InvalidGeometry {
                    path_type: path.path_type,
                    points: path.points.len(),
                    required,
                });
            }
        }
        let mut elements = snapshot.elements;
        for element in &mut elements {
            element.set_position(element.position);
        }
        let mut diagram = Self {
            elements,
            paths: snapshot.paths,
            next_number: 1,
        };
        diagram.recompute_next_number();
        log::info!(
            "Loaded diagram with {} elements and {} paths",
            diagram.elements.len(),
            diagram.paths.len()
        );
        Ok(diagram)
    }

    /// Copy out the current state for persistence.
    pub fn snapshot(&self) -> DiagramSnapshot {
        DiagramSnapshot {
            elements: self.elements.clone(),
            paths: self.paths.clone(),
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn paths(&self) -> &[DrawingPath] {
        &self.paths
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn path(&self, id: PathId) -> Option<&DrawingPath> {
        self.paths.iter().find(|p| p.id == id)
    }

    fn element_mut(&mut self, id: ElementId) -> BoardResult<&mut Element> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(BoardError::UnknownElement(id))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.paths.is_empty()
    }

    /// Number of elements plus paths.
    pub fn len(&self) -> usize {
        self.elements.len() + self.paths.len()
    }

    /// The jersey number the next player will receive.
    pub fn next_number(&self) -> u8 {
        self.next_number
    }

    /// Place a new element, applying the numbering and z-index policies.
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        position: Point,
        team: TeamColor,
    ) -> ElementId {
        let mut z_index = self.len() as i32;
        if kind == ElementKind::Ball {
            z_index += BALL_Z_BIAS;
        }
        let mut element = Element::new(kind, position).with_z_index(z_index);
        if kind.uses_team_color() {
            element.team_color = team;
        }
        if kind.is_numbered() {
            element.number = Some(self.take_number());
        }
        let id = element.id;
        log::debug!(
            "Added {} {} at ({:.3}, {:.3})",
            kind.name(),
            id,
            element.position.x,
            element.position.y
        );
        self.elements.push(element);
        id
    }

    /// Move an element; the position is re-clamped. Returns the final position.
    pub fn move_element(&mut self, id: ElementId, position: Point) -> BoardResult<Point> {
        let element = self.element_mut(id)?;
        let clamped = element.set_position(position);
        log::trace!("Moved {} to ({:.3}, {:.3})", id, clamped.x, clamped.y);
        Ok(clamped)
    }

    /// Remove an element, recomputing the numbering counter.
    pub fn delete_element(&mut self, id: ElementId) -> BoardResult<Element> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or(BoardError::UnknownElement(id))?;
        let removed = self.elements.remove(index);
        if removed.number.is_some() {
            self.recompute_next_number();
        }
        log::debug!("Deleted {} {}", removed.kind.name(), id);
        Ok(removed)
    }

    /// Commit a new path. Fails below the type's minimum point count.
    pub fn add_path(&mut self, points: Vec<Point>, attrs: &PathAttrs) -> BoardResult<PathId> {
        let required = attrs.path_type.min_points();
        if points.len() < required {
            log::warn!(
                "Rejected {:?} with {} points (needs {})",
                attrs.path_type,
                points.len(),
                required
            );
            return Err(BoardError::InvalidGeometry {
                path_type: attrs.path_type,
                points: points.len(),
                required,
            });
        }
        let path = DrawingPath::from_attrs(points, attrs, self.len() as i32);
        let id = path.id;
        log::debug!("Added {:?} path {} with {} points", path.path_type, id, path.points.len());
        self.paths.push(path);
        Ok(id)
    }

    /// Remove a path.
    pub fn delete_path(&mut self, id: PathId) -> BoardResult<DrawingPath> {
        let index = self
            .paths
            .iter()
            .position(|p| p.id == id)
            .ok_or(BoardError::UnknownPath(id))?;
        log::debug!("Deleted path {}", id);
        Ok(self.paths.remove(index))
    }

    /// Remove everything and reset numbering.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.paths.clear();
        self.next_number = 1;
    }

    /// Remove the most recently committed path.
    pub fn pop_last_path(&mut self) -> Option<DrawingPath> {
        self.paths.pop()
    }

    /// Remove the most recently committed element.
    pub fn pop_last_element(&mut self) -> Option<Element> {
        let removed = self.elements.pop()?;
        if removed.number.is_some() {
            self.recompute_next_number();
        }
        Some(removed)
    }

    pub fn set_team_color(&mut self, id: ElementId, team: TeamColor) -> BoardResult<()> {
        self.element_mut(id)?.team_color = team;
        Ok(())
    }

    /// Set or clear a jersey number. Numbers are clamped into `1..=11`;
    /// non-numbered kinds ignore the request.
    pub fn set_number(&mut self, id: ElementId, number: Option<u8>) -> BoardResult<()> {
        let element = self.element_mut(id)?;
        if element.kind.is_numbered() {
            element.number = number.map(|n| n.clamp(1, MAX_JERSEY_NUMBER));
        }
        Ok(())
    }

    pub fn set_rotation(&mut self, id: ElementId, degrees: f64) -> BoardResult<()> {
        self.element_mut(id)?.rotation = degrees.rem_euclid(360.0);
        Ok(())
    }

    pub fn set_scale(&mut self, id: ElementId, scale: f64) -> BoardResult<()> {
        self.element_mut(id)?.scale = scale.clamp(0.25, 4.0);
        Ok(())
    }

    pub fn set_z_index(&mut self, id: ElementId, z_index: i32) -> BoardResult<()> {
        self.element_mut(id)?.z_index = z_index;
        Ok(())
    }

    /// Raise an element above every other item.
    pub fn bring_to_front(&mut self, id: ElementId) -> BoardResult<i32> {
        let current = self.element(id).ok_or(BoardError::UnknownElement(id))?.z_index;
        let top_other = self
            .items_by_paint_order()
            .into_iter()
            .filter(|item| !matches!(item, DiagramItem::Element(e) if e.id == id))
            .map(|item| item.z_index())
            .max();
        match top_other {
            Some(top) if current <= top => {
                let z_index = top.saturating_add(1);
                self.set_z_index(id, z_index)?;
                Ok(z_index)
            }
            _ => Ok(current),
        }
    }

    /// Copy an element next to the original. The number is copied verbatim.
    pub fn duplicate_element(&mut self, id: ElementId, offset: f64) -> BoardResult<ElementId> {
        let mut copy = self
            .element(id)
            .cloned()
            .ok_or(BoardError::UnknownElement(id))?;
        copy.regenerate_id();
        copy.set_position(copy.position + Vec2::new(offset, offset));
        copy.z_index = self.top_z_index().saturating_add(1);
        let new_id = copy.id;
        self.elements.push(copy);
        Ok(new_id)
    }

    /// Every item sorted back to front. Ties keep elements before paths and
    /// commit order within each collection.
    pub fn items_by_paint_order(&self) -> Vec<DiagramItem<'_>> {
        let mut items: Vec<DiagramItem<'_>> = self
            .elements
            .iter()
            .map(DiagramItem::Element)
            .chain(self.paths.iter().map(DiagramItem::Path))
            .collect();
        items.sort_by_key(|item| item.z_index());
        items
    }

    /// Topmost element whose token covers `point` (normalized).
    pub fn element_at(&self, point: Point, config: &BoardConfig) -> Option<ElementId> {
        let surface = config.surface();
        let target = surface.to_pixels(point);
        self.items_by_paint_order()
            .into_iter()
            .rev()
            .find_map(|item| match item {
                DiagramItem::Element(e) => {
                    let reach = config.element_hit_radius_px * e.kind.size_factor() * e.scale;
                    (surface.to_pixels(e.position).distance(target) <= reach).then_some(e.id)
                }
                DiagramItem::Path(_) => None,
            })
    }

    /// Topmost element or path under `point` (normalized), for the eraser.
    ///
    /// Zones hit by containment; other paths by distance to their polyline
    /// within the fixed eraser tolerance.
    pub fn hit_test(&self, point: Point, config: &BoardConfig) -> Option<Hit> {
        let surface = config.surface();
        let target = surface.to_pixels(point);
        self.items_by_paint_order()
            .into_iter()
            .rev()
            .find_map(|item| match item {
                DiagramItem::Element(e) => {
                    let reach = config
                        .element_hit_radius_px
                        .max(config.element_hit_radius_px * e.kind.size_factor() * e.scale);
                    (surface.to_pixels(e.position).distance(target) <= reach)
                        .then_some(Hit::Element(e.id))
                }
                DiagramItem::Path(p) => {
                    let mut pixels: Vec<Point> =
                        p.points.iter().map(|&q| surface.to_pixels(q)).collect();
                    // Measure against the curve that is drawn, not its control points.
                    if p.path_type.is_smoothed() {
                        pixels = flatten_segments(&smooth_polyline(&pixels), HIT_CURVE_STEPS);
                    }
                    let inside = p.path_type.is_closed() && point_in_polygon(target, &pixels);
                    let near =
                        point_to_polyline_dist(target, &pixels) <= config.eraser_tolerance_px;
                    (inside || near).then_some(Hit::Path(p.id))
                }
            })
    }

    fn top_z_index(&self) -> i32 {
        self.items_by_paint_order()
            .last()
            .map(|item| item.z_index())
            .unwrap_or(i32::MIN)
    }

    fn take_number(&mut self) -> u8 {
        let number = self.next_number;
        self.next_number = number % MAX_JERSEY_NUMBER + 1;
        number
    }

    fn recompute_next_number(&mut self) {
        self.next_number = self
            .elements
            .iter()
            .filter_map(|e| e.number)
            .max()
            .map(|max| max % MAX_JERSEY_NUMBER + 1)
            .unwrap_or(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CLAMP_MAX, CLAMP_MIN};
    use crate::model::PathType;

    fn players(diagram: &mut Diagram, count: usize) -> Vec<ElementId> {
        (0..count)
            .map(|i| {
                diagram.add_element(
                    ElementKind::Player,
                    Point::new(0.1 + i as f64 * 0.05, 0.5),
                    TeamColor::Home,
                )
            })
            .collect()
    }

    #[test]
    fn test_numbering_wraps_after_eleven() {
        let mut diagram = Diagram::new();
        players(&mut diagram, 12);
        let numbers: Vec<u8> = diagram.elements().iter().filter_map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 1]);
    }

    #[test]
    fn test_numbering_recovers_after_delete() {
        let mut diagram = Diagram::new();
        let ids = players(&mut diagram, 4);
        diagram.delete_element(ids[3]).unwrap();
        assert_eq!(diagram.next_number(), 4);
        diagram.delete_element(ids[0]).unwrap();
        assert_eq!(diagram.next_number(), 4);
        diagram.delete_element(ids[1]).unwrap();
        diagram.delete_element(ids[2]).unwrap();
        assert_eq!(diagram.next_number(), 1);
    }

    #[test]
    fn test_numbering_after_deleting_eleven() {
        let mut diagram = Diagram::new();
        let ids = players(&mut diagram, 11);
        diagram.delete_element(ids[0]).unwrap();
        // max remaining is 11 -> wraps to 1
        assert_eq!(diagram.next_number(), 1);
    }

    #[test]
    fn test_ball_z_bias() {
        let mut diagram = Diagram::new();
        diagram.add_element(ElementKind::Cone, Point::new(0.2, 0.2), TeamColor::Neutral);
        let ball = diagram.add_element(ElementKind::Ball, Point::new(0.3, 0.3), TeamColor::Neutral);
        assert_eq!(diagram.element(ball).unwrap().z_index, 101);
        assert_eq!(diagram.element(ball).unwrap().number, None);
    }

    #[test]
    fn test_move_unknown_element() {
        let mut diagram = Diagram::new();
        let id = uuid::Uuid::new_v4();
        assert_eq!(
            diagram.move_element(id, Point::new(0.5, 0.5)),
            Err(BoardError::UnknownElement(id))
        );
    }

    #[test]
    fn test_move_reclamps() {
        let mut diagram = Diagram::new();
        let id = diagram.add_element(ElementKind::Player, Point::new(0.5, 0.5), TeamColor::Home);
        let p = diagram.move_element(id, Point::new(1.5, -0.2)).unwrap();
        assert_eq!(p, Point::new(CLAMP_MAX, CLAMP_MIN));
    }

    #[test]
    fn test_add_path_minimums() {
        let mut diagram = Diagram::new();
        let two = vec![Point::new(0.1, 0.1), Point::new(0.5, 0.5)];
        let err = diagram.add_path(two.clone(), &PathAttrs::new(PathType::Zone)).unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidGeometry { path_type: PathType::Zone, points: 2, required: 3 }
        );
        assert!(diagram.add_path(two, &PathAttrs::new(PathType::Arrow)).is_ok());
        assert!(diagram.add_path(vec![Point::ZERO], &PathAttrs::new(PathType::Line)).is_err());
        assert_eq!(diagram.paths().len(), 1);
    }

    #[test]
    fn test_delete_unknown_path() {
        let mut diagram = Diagram::new();
        let id = uuid::Uuid::new_v4();
        assert_eq!(diagram.delete_path(id), Err(BoardError::UnknownPath(id)));
    }

    #[test]
    fn test_clear_resets_numbering() {
        let mut diagram = Diagram::new();
        players(&mut diagram, 3);
        diagram.clear();
        assert!(diagram.is_empty());
        assert_eq!(diagram.next_number(), 1);
    }

    #[test]
    fn test_duplicate_copies_number() {
        let mut diagram = Diagram::new();
        let id = diagram.add_element(ElementKind::Player, Point::new(0.5, 0.5), TeamColor::Away);
        let copy = diagram.duplicate_element(id, 0.04).unwrap();
        assert_ne!(copy, id);
        let original = diagram.element(id).unwrap();
        let duplicate = diagram.element(copy).unwrap();
        assert_eq!(duplicate.number, original.number);
        assert_eq!(duplicate.team_color, TeamColor::Away);
        assert!(duplicate.z_index > original.z_index);
        assert!((duplicate.position().x - 0.54).abs() < 1e-9);
    }

    #[test]
    fn test_paint_order_and_hit_test() {
        let config = BoardConfig::default();
        let mut diagram = Diagram::new();
        let below =
            diagram.add_element(ElementKind::Cone, Point::new(0.5, 0.5), TeamColor::Neutral);
        let ball = diagram.add_element(ElementKind::Ball, Point::new(0.5, 0.5), TeamColor::Neutral);
        assert_eq!(diagram.hit_test(Point::new(0.5, 0.5), &config), Some(Hit::Element(ball)));
        diagram.bring_to_front(below).unwrap();
        assert_eq!(diagram.hit_test(Point::new(0.5, 0.5), &config), Some(Hit::Element(below)));
        assert_eq!(diagram.hit_test(Point::new(0.05, 0.05), &config), None);
    }

    #[test]
    fn test_zone_hit_by_containment() {
        let config = BoardConfig::default();
        let mut diagram = Diagram::new();
        let zone = diagram
            .add_path(
                vec![
                    Point::new(0.1, 0.1),
                    Point::new(0.9, 0.1),
                    Point::new(0.9, 0.9),
                    Point::new(0.1, 0.9),
                ],
                &PathAttrs::new(PathType::Zone),
            )
            .unwrap();
        assert_eq!(diagram.hit_test(Point::new(0.5, 0.5), &config), Some(Hit::Path(zone)));
    }

    #[test]
    fn test_curved_path_hit_on_drawn_curve() {
        let config = BoardConfig::default();
        let mut diagram = Diagram::new();
        let curve = diagram
            .add_path(
                vec![Point::new(0.1, 0.5), Point::new(0.9, 0.5)],
                &PathAttrs::new(PathType::CurvedArrow),
            )
            .unwrap();
        // The two-point curve bows ~43px below its chord at the midpoint.
        assert_eq!(diagram.hit_test(Point::new(0.5, 0.5), &config), None);
        assert_eq!(
            diagram.hit_test(Point::new(0.5, 0.58), &config),
            Some(Hit::Path(curve))
        );
    }

    #[test]
    fn test_set_z_index_reorders_paint() {
        let mut diagram = Diagram::new();
        let first =
            diagram.add_element(ElementKind::Cone, Point::new(0.3, 0.3), TeamColor::Neutral);
        let second =
            diagram.add_element(ElementKind::Cone, Point::new(0.6, 0.6), TeamColor::Neutral);
        diagram.set_z_index(first, 10).unwrap();
        let order: Vec<i32> = diagram.items_by_paint_order().iter().map(|i| i.z_index()).collect();
        assert_eq!(order, vec![1, 10]);
        assert_eq!(diagram.bring_to_front(first).unwrap(), 10);
        assert_eq!(diagram.bring_to_front(second).unwrap(), 11);
        let ghost = ElementId::new_v4();
        assert_eq!(diagram.set_z_index(ghost, 0), Err(BoardError::UnknownElement(ghost)));
        assert_eq!(diagram.bring_to_front(ghost), Err(BoardError::UnknownElement(ghost)));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut diagram = Diagram::new();
        players(&mut diagram, 2);
        diagram
            .add_path(
                vec![Point::new(0.1, 0.1), Point::new(0.4, 0.4)],
                &PathAttrs::new(PathType::Arrow),
            )
            .unwrap();
        let json = diagram.snapshot().to_json().unwrap();
        let restored = Diagram::from_snapshot(DiagramSnapshot::from_json(&json).unwrap()).unwrap();
        assert_eq!(restored.snapshot(), diagram.snapshot());
        assert_eq!(restored.next_number(), 3);
    }

    #[test]
    fn test_from_snapshot_rejects_short_zone() {
        let mut snapshot = DiagramSnapshot::default();
        let mut zone = DrawingPath::from_attrs(
            vec![Point::new(0.1, 0.1), Point::new(0.2, 0.2), Point::new(0.3, 0.1)],
            &PathAttrs::new(PathType::Zone),
            0,
        );
        zone.points.pop();
        snapshot.paths.push(zone);
        assert!(matches!(
            Diagram::from_snapshot(snapshot),
            Err(BoardError::InvalidGeometry { required: 3, .. })
        ));
    }
}
