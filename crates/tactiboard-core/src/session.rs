//! Gesture-driven edit session.
//!
//! The session is the only mutator of its [`Diagram`]. Every gesture goes
//! through [`EditSession::apply`]; user-visible mutations come back as an
//! [`EditEvent`] and are also queued for [`EditSession::poll_events`], so the
//! embedding shell can re-render and persist without observing the model.

use crate::config::BoardConfig;
use crate::error::BoardResult;
use crate::geometry::is_on_surface;
use crate::model::{
    Diagram, DiagramSnapshot, ElementId, ElementKind, Hit, PathAttrs, PathId, PathType, TeamColor,
};
use crate::tools::{StrokeBuffer, ToolKind};
use kurbo::{Point, Vec2};

/// Pointer phase delivered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Down,
    Move,
    Up,
}

/// Interaction state of the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// A stroke is being accumulated; nothing is committed yet.
    DrawingInProgress(StrokeBuffer),
    /// An element follows the pointer.
    DraggingElement {
        id: ElementId,
        /// Element position minus the pointer-down position.
        grab_offset: Vec2,
    },
    /// An element is selected for property edits or deletion.
    Selected(ElementId),
}

/// What changed in the diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    ElementAdded(ElementId),
    ElementMoved { id: ElementId, position: Point },
    ElementUpdated(ElementId),
    ElementDeleted(ElementId),
    PathAdded(PathId),
    PathDeleted(PathId),
    Cleared,
}

/// Live, non-interactive preview of the stroke being drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePreview<'a> {
    pub path_type: PathType,
    pub points: &'a [Point],
}

/// One editing session over one diagram.
#[derive(Debug, Clone)]
pub struct EditSession {
    diagram: Diagram,
    config: BoardConfig,
    state: SessionState,
    /// Tool that started the gesture currently in progress.
    gesture_tool: Option<ToolKind>,
    /// Team assigned to newly placed players, goalkeepers and flags.
    current_team: TeamColor,
    events: Vec<EditEvent>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl EditSession {
    /// Start a session on an empty diagram.
    pub fn new(config: BoardConfig) -> Self {
        Self::with_diagram(Diagram::new(), config)
    }

    /// Start a session on a stored snapshot.
    pub fn load(snapshot: DiagramSnapshot, config: BoardConfig) -> BoardResult<Self> {
        Ok(Self::with_diagram(Diagram::from_snapshot(snapshot)?, config))
    }

    fn with_diagram(diagram: Diagram, config: BoardConfig) -> Self {
        Self {
            diagram,
            config,
            state: SessionState::Idle,
            gesture_tool: None,
            current_team: TeamColor::Home,
            events: Vec::new(),
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Copy out the diagram for persistence.
    pub fn snapshot(&self) -> DiagramSnapshot {
        self.diagram.snapshot()
    }

    /// The element currently selected or being dragged.
    pub fn selected(&self) -> Option<ElementId> {
        match self.state {
            SessionState::Selected(id) | SessionState::DraggingElement { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn current_team(&self) -> TeamColor {
        self.current_team
    }

    pub fn set_current_team(&mut self, team: TeamColor) {
        self.current_team = team;
    }

    /// The uncommitted stroke, if one is being drawn.
    pub fn preview(&self) -> Option<StrokePreview<'_>> {
        match &self.state {
            SessionState::DrawingInProgress(buffer) => Some(StrokePreview {
                path_type: buffer.path_type(),
                points: buffer.points(),
            }),
            _ => None,
        }
    }

    /// Drain the events emitted since the last call.
    pub fn poll_events(&mut self) -> Vec<EditEvent> {
        std::mem::take(&mut self.events)
    }

    /// Interpret one pointer event under `tool`. `point` is normalized.
    pub fn apply(&mut self, gesture: Gesture, tool: ToolKind, point: Point) -> Option<EditEvent> {
        if gesture != Gesture::Down && self.gesture_tool.is_some_and(|t| t != tool) {
            log::debug!("Tool changed mid-gesture, cancelling");
            self.cancel_gesture();
        }
        match gesture {
            Gesture::Down => self.pointer_down(tool, point),
            Gesture::Move => self.pointer_move(point),
            Gesture::Up => self.pointer_up(point),
        }
    }

    /// Abandon the gesture in progress without committing anything.
    pub fn cancel_gesture(&mut self) {
        self.gesture_tool = None;
        self.state = match self.state {
            SessionState::DraggingElement { id, .. } => SessionState::Selected(id),
            SessionState::Selected(id) => SessionState::Selected(id),
            _ => SessionState::Idle,
        };
    }

    fn pointer_down(&mut self, tool: ToolKind, point: Point) -> Option<EditEvent> {
        if self.gesture_tool.is_some() {
            // A down without a matching up: the previous gesture is lost.
            self.cancel_gesture();
        }
        self.gesture_tool = Some(tool);

        if let Some(path_type) = tool.path_type() {
            let start = clamp_unit(point);
            log::trace!("Begin {:?} stroke at ({:.3}, {:.3})", path_type, start.x, start.y);
            self.state = SessionState::DrawingInProgress(StrokeBuffer::begin(path_type, start));
            return None;
        }

        match tool {
            ToolKind::Select => {
                match self.diagram.element_at(point, &self.config) {
                    Some(id) => {
                        let position = self.diagram.element(id)?.position();
                        self.state = SessionState::DraggingElement {
                            id,
                            grab_offset: position - point,
                        };
                    }
                    None => self.state = SessionState::Idle,
                }
                None
            }
            ToolKind::Eraser => {
                self.state = SessionState::Idle;
                self.erase_at(point)
            }
            // Place tools commit on release.
            _ => {
                self.state = SessionState::Idle;
                None
            }
        }
    }

    fn pointer_move(&mut self, point: Point) -> Option<EditEvent> {
        self.gesture_tool?;
        let surface = self.config.surface();
        match &mut self.state {
            SessionState::DrawingInProgress(buffer) => {
                buffer.push(clamp_unit(point), self.config.min_point_spacing_px, |a, b| {
                    surface.to_pixels(a).distance(surface.to_pixels(b))
                });
                None
            }
            SessionState::DraggingElement { id, grab_offset } => {
                let (id, target) = (*id, point + *grab_offset);
                self.drag_to(id, target)
            }
            _ => None,
        }
    }

    fn pointer_up(&mut self, point: Point) -> Option<EditEvent> {
        let tool = self.gesture_tool.take()?;
        match std::mem::take(&mut self.state) {
            SessionState::DrawingInProgress(mut buffer) => {
                let surface = self.config.surface();
                buffer.push(clamp_unit(point), self.config.min_point_spacing_px, |a, b| {
                    surface.to_pixels(a).distance(surface.to_pixels(b))
                });
                self.commit_stroke(buffer)
            }
            SessionState::DraggingElement { id, grab_offset } => {
                self.state = SessionState::Selected(id);
                self.drag_to(id, point + grab_offset)
            }
            other => {
                self.state = other;
                let kind = tool.placed_kind()?;
                self.place(kind, point)
            }
        }
    }

    fn place(&mut self, kind: ElementKind, point: Point) -> Option<EditEvent> {
        if !is_on_surface(point) {
            log::debug!("Ignored {} placement outside the surface", kind.name());
            return None;
        }
        let id = self.diagram.add_element(kind, point, self.current_team);
        self.emit(EditEvent::ElementAdded(id))
    }

    fn commit_stroke(&mut self, buffer: StrokeBuffer) -> Option<EditEvent> {
        if !buffer.is_committable() {
            log::debug!(
                "Discarded {:?} stroke with {} points",
                buffer.path_type(),
                buffer.len()
            );
            return None;
        }
        let attrs = PathAttrs::from_config(buffer.path_type(), &self.config);
        let id = self.diagram.add_path(buffer.into_points(), &attrs).ok()?;
        self.emit(EditEvent::PathAdded(id))
    }

    fn drag_to(&mut self, id: ElementId, target: Point) -> Option<EditEvent> {
        let before = self.diagram.element(id)?.position();
        let position = self.diagram.move_element(id, target).ok()?;
        if position == before {
            return None;
        }
        self.emit(EditEvent::ElementMoved { id, position })
    }

    fn erase_at(&mut self, point: Point) -> Option<EditEvent> {
        match self.diagram.hit_test(point, &self.config)? {
            Hit::Element(id) => {
                self.diagram.delete_element(id).ok()?;
                self.forget_selection(id);
                self.emit(EditEvent::ElementDeleted(id))
            }
            Hit::Path(id) => {
                self.diagram.delete_path(id).ok()?;
                self.emit(EditEvent::PathDeleted(id))
            }
        }
    }

    /// Remove the most recent path, or failing that the most recent element.
    pub fn undo(&mut self) -> Option<EditEvent> {
        if let Some(path) = self.diagram.pop_last_path() {
            log::debug!("Undo path {}", path.id());
            return self.emit(EditEvent::PathDeleted(path.id()));
        }
        let element = self.diagram.pop_last_element()?;
        log::debug!("Undo element {}", element.id());
        self.forget_selection(element.id());
        self.emit(EditEvent::ElementDeleted(element.id()))
    }

    /// Remove every element and path. Cannot be undone.
    pub fn clear(&mut self) -> Option<EditEvent> {
        self.diagram.clear();
        self.state = SessionState::Idle;
        self.gesture_tool = None;
        log::info!("Cleared diagram");
        self.emit(EditEvent::Cleared)
    }

    /// Commit a path directly, bypassing the gesture state machine.
    pub fn add_path(&mut self, points: Vec<Point>, attrs: &PathAttrs) -> BoardResult<PathId> {
        let id = self.diagram.add_path(points, attrs)?;
        self.emit(EditEvent::PathAdded(id));
        Ok(id)
    }

    /// Move an element directly, bypassing the gesture state machine.
    pub fn move_element(&mut self, id: ElementId, position: Point) -> BoardResult<Point> {
        let position = self.diagram.move_element(id, position)?;
        self.emit(EditEvent::ElementMoved { id, position });
        Ok(position)
    }

    /// Delete an element directly.
    pub fn delete_element(&mut self, id: ElementId) -> BoardResult<()> {
        self.diagram.delete_element(id)?;
        self.forget_selection(id);
        self.emit(EditEvent::ElementDeleted(id));
        Ok(())
    }

    /// Delete a path directly.
    pub fn delete_path(&mut self, id: PathId) -> BoardResult<()> {
        self.diagram.delete_path(id)?;
        self.emit(EditEvent::PathDeleted(id));
        Ok(())
    }

    /// Delete the selected element.
    pub fn delete_selected(&mut self) -> Option<EditEvent> {
        let id = self.selected_idle()?;
        self.diagram.delete_element(id).ok()?;
        self.state = SessionState::Idle;
        self.emit(EditEvent::ElementDeleted(id))
    }

    /// Duplicate the selected element and select the copy.
    pub fn duplicate_selected(&mut self) -> Option<EditEvent> {
        let id = self.selected_idle()?;
        let copy = self
            .diagram
            .duplicate_element(id, self.config.duplicate_offset)
            .ok()?;
        self.state = SessionState::Selected(copy);
        self.emit(EditEvent::ElementAdded(copy))
    }

    pub fn set_selected_team(&mut self, team: TeamColor) -> Option<EditEvent> {
        self.update_selected(|diagram, id| diagram.set_team_color(id, team))
    }

    pub fn set_selected_number(&mut self, number: Option<u8>) -> Option<EditEvent> {
        self.update_selected(|diagram, id| diagram.set_number(id, number))
    }

    /// Rotate the selected element by `delta` degrees.
    pub fn rotate_selected(&mut self, delta: f64) -> Option<EditEvent> {
        self.update_selected(|diagram, id| {
            let rotation = diagram.element(id).map_or(0.0, |e| e.rotation);
            diagram.set_rotation(id, rotation + delta)
        })
    }

    /// Multiply the selected element's scale by `factor`.
    pub fn scale_selected(&mut self, factor: f64) -> Option<EditEvent> {
        self.update_selected(|diagram, id| {
            let scale = diagram.element(id).map_or(1.0, |e| e.scale);
            diagram.set_scale(id, scale * factor)
        })
    }

    pub fn bring_selected_to_front(&mut self) -> Option<EditEvent> {
        self.update_selected(|diagram, id| diagram.bring_to_front(id).map(|_| ()))
    }

    fn update_selected(
        &mut self,
        edit: impl FnOnce(&mut Diagram, ElementId) -> BoardResult<()>,
    ) -> Option<EditEvent> {
        let id = self.selected_idle()?;
        if let Err(err) = edit(&mut self.diagram, id) {
            log::warn!("Property edit failed: {}", err);
            return None;
        }
        self.emit(EditEvent::ElementUpdated(id))
    }

    /// Selected element, only when no gesture is in flight.
    fn selected_idle(&self) -> Option<ElementId> {
        match self.state {
            SessionState::Selected(id) => Some(id),
            _ => None,
        }
    }

    fn forget_selection(&mut self, id: ElementId) {
        if self.selected() == Some(id) {
            self.state = SessionState::Idle;
            self.gesture_tool = None;
        }
    }

    fn emit(&mut self, event: EditEvent) -> Option<EditEvent> {
        self.events.push(event.clone());
        Some(event)
    }
}

/// Keep stroke points on the surface.
fn clamp_unit(point: Point) -> Point {
    Point::new(point.x.clamp(0.0, 1.0), point.y.clamp(0.0, 1.0))
}
