//! Backend-neutral renderer that records draw commands.
//!
//! A host hands the recorded list to whatever 2D API it has (vello, canvas,
//! skia). Everything is already in pixel space.

use crate::pitch;
use crate::renderer::{RenderContext, RenderResult, RenderSource, Renderer};
use kurbo::{Affine, BezPath, Circle, Line, Point, Rect, RoundedRect, Shape, Size, Stroke};
use peniko::Color;
use tactiboard_core::clock::Frame;
use tactiboard_core::geometry::{
    PathSegment, default_arrow_head, dot_markers, segments_to_bez_path, smooth_polyline,
    straight_segments,
};
use tactiboard_core::model::DiagramItem;
use tactiboard_core::scene::{Interpolation, Scene};
use tactiboard_core::{
    Diagram, DrawingPath, EditSession, Element, ElementKind, PathType, StrokePreview,
};

const TOLERANCE: f64 = 0.1;
const SELECTION_GAP: f64 = 6.0;

/// One recorded drawing operation.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Fill {
        path: BezPath,
        color: Color,
    },
    Stroke {
        path: BezPath,
        color: Color,
        style: Stroke,
    },
    Label {
        text: String,
        /// Centre of the text.
        position: Point,
        size: f64,
        color: Color,
    },
}

/// Renderer that records [`DrawCommand`]s instead of rasterizing.
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    commands: Vec<DrawCommand>,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands from the last pass.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    fn fill(&mut self, path: impl Shape, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.to_path(TOLERANCE),
            color,
        });
    }

    fn stroke(&mut self, path: impl Shape, color: Color, style: Stroke) {
        self.commands.push(DrawCommand::Stroke {
            path: path.to_path(TOLERANCE),
            color,
            style,
        });
    }

    fn label(&mut self, text: String, position: Point, size: f64, color: Color) {
        self.commands.push(DrawCommand::Label {
            text,
            position,
            size,
            color,
        });
    }

    fn render_diagram_items(&mut self, ctx: &RenderContext, diagram: &Diagram) {
        for item in diagram.items_by_paint_order() {
            match item {
                DiagramItem::Element(element) => {
                    self.render_token(ctx, element, element.position(), element.rotation)
                }
                DiagramItem::Path(path) => self.render_path(ctx, path),
            }
        }

        if let Some(element) = ctx.selected.and_then(|id| diagram.element(id)) {
            let center = ctx.surface.to_pixels(element.position());
            let radius = token_radius(ctx, element) + SELECTION_GAP;
            self.stroke(Circle::new(center, radius), ctx.selection_color, Stroke::new(2.0));
        }

        if let Some(preview) = ctx.preview {
            self.render_preview(ctx, preview);
        }
    }

    fn render_frame_items(&mut self, ctx: &RenderContext, scene: &Scene, frame: &Frame) {
        if ctx.show_motion_trails {
            let trail_color = Color::from_rgba8(255, 255, 255, 70);
            let style = Stroke::new(1.5).with_dashes(0.0, [4.0, 4.0]);
            for motion in scene.actors.iter().filter_map(|a| a.motion.as_ref()) {
                let px: Vec<Point> =
                    motion.waypoints.iter().map(|p| ctx.surface.to_pixels(*p)).collect();
                let segments = match motion.interpolation {
                    Interpolation::Linear => straight_segments(&px),
                    Interpolation::Curved => smooth_polyline(&px),
                };
                if !segments.is_empty() {
                    self.stroke(segments_to_bez_path(&segments), trail_color, style.clone());
                }
            }
        }

        let mut actors: Vec<_> = scene.actors.iter().collect();
        actors.sort_by_key(|a| a.element.z_index);
        for actor in actors {
            let element = &actor.element;
            let (position, rotation) = match frame.pose(element.id()) {
                Some(pose) => (pose.position, pose.rotation_deg),
                None => (element.position(), element.rotation),
            };
            self.render_token(ctx, element, position, rotation);
        }
    }

    /// Draw one token centred on normalized `position`.
    fn render_token(
        &mut self,
        ctx: &RenderContext,
        element: &Element,
        position: Point,
        rotation_deg: f64,
    ) {
        let c = ctx.surface.to_pixels(position);
        let r = token_radius(ctx, element);
        let rotate = Affine::rotate_about(rotation_deg.to_radians(), c);
        let fill: Color = element.fill_color().into();
        let white = Color::WHITE;
        let dark = Color::from_rgba8(30, 30, 30, 255);

        match element.kind {
            ElementKind::Player => {
                self.fill(Circle::new(c, r), fill);
                self.stroke(Circle::new(c, r), white, Stroke::new(2.0));
                self.number_label(element, c, r);
            }
            ElementKind::Goalkeeper => {
                self.fill(Circle::new(c, r), fill);
                self.stroke(Circle::new(c, r), dark, Stroke::new(3.5));
                self.number_label(element, c, r);
            }
            ElementKind::Ball => {
                self.fill(Circle::new(c, r), white);
                self.stroke(Circle::new(c, r), Color::BLACK, Stroke::new(1.5));
                self.fill(Circle::new(c, r * 0.35), Color::BLACK);
            }
            ElementKind::Cone => {
                let mut tri = BezPath::new();
                tri.move_to((c.x, c.y - r));
                tri.line_to((c.x - r * 0.9, c.y + r * 0.8));
                tri.line_to((c.x + r * 0.9, c.y + r * 0.8));
                tri.close_path();
                self.fill(rotate * tri.clone(), fill);
                self.stroke(rotate * tri, white, Stroke::new(1.0));
            }
            ElementKind::Flag => {
                let top = Point::new(c.x - r * 0.4, c.y - r);
                let pole = Line::new(Point::new(top.x, c.y + r), top);
                let mut pennant = BezPath::new();
                pennant.move_to(top);
                pennant.line_to((top.x + r, top.y + r * 0.35));
                pennant.line_to((top.x, top.y + r * 0.7));
                pennant.close_path();
                self.stroke(rotate * pole.to_path(TOLERANCE), dark, Stroke::new(2.0));
                self.fill(rotate * pennant, fill);
            }
            ElementKind::Mannequin => {
                let body = RoundedRect::new(
                    c.x - r * 0.45,
                    c.y - r * 0.3,
                    c.x + r * 0.45,
                    c.y + r,
                    r * 0.2,
                );
                let head = Circle::new(Point::new(c.x, c.y - r * 0.6), r * 0.3);
                self.fill(rotate * body.to_path(TOLERANCE), fill);
                self.fill(rotate * head.to_path(TOLERANCE), fill);
            }
            ElementKind::Ladder => {
                let half_width = r * 0.35;
                let mut ladder = BezPath::new();
                for y in [c.y - half_width, c.y + half_width] {
                    ladder.move_to((c.x - r, y));
                    ladder.line_to((c.x + r, y));
                }
                const RUNGS: usize = 6;
                for i in 0..RUNGS {
                    let x = c.x - r + 2.0 * r * i as f64 / (RUNGS - 1) as f64;
                    ladder.move_to((x, c.y - half_width));
                    ladder.line_to((x, c.y + half_width));
                }
                self.stroke(rotate * ladder, fill, Stroke::new(2.0));
            }
            ElementKind::Goal => self.goal_frame(c, r, 7, rotate),
            ElementKind::MiniGoal => self.goal_frame(c, r, 3, rotate),
        }
    }

    fn number_label(&mut self, element: &Element, center: Point, radius: f64) {
        if let Some(number) = element.number {
            self.label(number.to_string(), center, radius, Color::WHITE);
        }
    }

    fn goal_frame(&mut self, c: Point, r: f64, net_lines: usize, rotate: Affine) {
        let frame = Rect::new(c.x - r, c.y - r * 0.2, c.x + r, c.y + r * 0.2);
        let mut net = BezPath::new();
        for i in 1..=net_lines {
            let x = frame.x0 + frame.width() * i as f64 / (net_lines + 1) as f64;
            net.move_to((x, frame.y0));
            net.line_to((x, frame.y1));
        }
        self.stroke(rotate * net, Color::from_rgba8(255, 255, 255, 100), Stroke::new(1.0));
        self.stroke(rotate * frame.to_path(TOLERANCE), Color::WHITE, Stroke::new(3.0));
    }

    fn render_path(&mut self, ctx: &RenderContext, path: &DrawingPath) {
        let px: Vec<Point> = path.points().iter().map(|p| ctx.surface.to_pixels(*p)).collect();
        let color: Color = path.stroke_color.into();
        let width = path.stroke_width;
        let mut style = Stroke::new(width);
        if path.is_dashed {
            style = style.with_dashes(0.0, [width * 3.0, width * 2.0]);
        }

        match path.path_type {
            PathType::Zone => {
                let polygon = polygon_path(&px);
                let fill = path.stroke_color.with_opacity(path.fill_opacity);
                self.fill(polygon.clone(), fill.into());
                self.stroke(polygon, color, style);
            }
            PathType::DottedRun => {
                let mut dots = BezPath::new();
                for marker in dot_markers(&px, width * 3.0) {
                    dots.extend(Circle::new(marker, width * 0.6).path_elements(TOLERANCE));
                }
                self.fill(dots, color);
                if path.has_arrow_head {
                    self.arrow_head(&straight_segments(&px), color, width);
                }
            }
            path_type => {
                let segments = if path_type.is_smoothed() {
                    smooth_polyline(&px)
                } else {
                    straight_segments(&px)
                };
                self.stroke(segments_to_bez_path(&segments), color, style);
                if path.has_arrow_head {
                    self.arrow_head(&segments, color, width);
                }
            }
        }
    }

    /// Arrowhead at the end of the last segment, following its tangent.
    fn arrow_head(&mut self, segments: &[PathSegment], color: Color, width: f64) {
        let Some(last) = segments.last() else {
            return;
        };
        if let Some(wings) = default_arrow_head(last.end_tangent_origin(), last.end()) {
            let mut head = BezPath::new();
            for wing in wings {
                head.move_to(wing.p0);
                head.line_to(wing.p1);
            }
            self.stroke(head, color, Stroke::new(width));
        }
    }

    fn render_preview(&mut self, ctx: &RenderContext, preview: StrokePreview) {
        let px: Vec<Point> = preview.points.iter().map(|p| ctx.surface.to_pixels(*p)).collect();
        let color = ctx.preview_color;
        match px.as_slice() {
            [] => {}
            [only] => self.fill(Circle::new(*only, 3.0), color),
            _ => {
                let path = if preview.path_type == PathType::Zone {
                    polygon_path(&px)
                } else {
                    segments_to_bez_path(&straight_segments(&px))
                };
                self.stroke(path, color, Stroke::new(2.0).with_dashes(0.0, [6.0, 4.0]));
                if preview.path_type.has_arrow_head() {
                    self.arrow_head(&straight_segments(&px), color, 2.0);
                }
            }
        }
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        ctx.validate()?;
        self.commands.clear();
        pitch::draw_pitch(ctx, &mut self.commands);

        match ctx.source {
            RenderSource::Diagram(diagram) => self.render_diagram_items(ctx, diagram),
            RenderSource::Frame { scene, frame } => self.render_frame_items(ctx, scene, frame),
        }

        log::trace!("Recorded {} draw commands", self.commands.len());
        Ok(())
    }
}

fn token_radius(ctx: &RenderContext, element: &Element) -> f64 {
    ctx.token_radius * element.kind.size_factor() * element.scale
}

fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// Record the session's diagram, selection and in-progress stroke.
pub fn render_diagram(session: &EditSession) -> RenderResult<Vec<DrawCommand>> {
    let ctx = RenderContext::diagram(session.diagram(), session.config().surface_size)
        .with_selection(session.selected())
        .with_preview(session.preview());
    let mut renderer = DisplayListRenderer::new();
    renderer.build_scene(&ctx)?;
    Ok(renderer.take_commands())
}

/// Record one animation frame of a scene.
pub fn render_frame(scene: &Scene, frame: &Frame, size: Size) -> RenderResult<Vec<DrawCommand>> {
    let ctx = RenderContext::frame(scene, frame, size);
    let mut renderer = DisplayListRenderer::new();
    renderer.build_scene(&ctx)?;
    log::debug!(
        "Rendered {} frame at t={:.2} ({} actors)",
        scene.category,
        frame.t,
        scene.actors.len()
    );
    Ok(renderer.take_commands())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{PitchStyle, RendererError};
    use tactiboard_core::scene::{ActorMode, Category, EquipmentSet, build_scene};
    use tactiboard_core::{
        BoardConfig, Gesture, PathAttrs, SerializableColor, TeamColor, ToolKind, advance,
    };

    const SIZE: Size = Size::new(360.0, 540.0);

    fn record(diagram: &Diagram) -> Vec<DrawCommand> {
        let ctx = RenderContext::diagram(diagram, SIZE).with_pitch(PitchStyle::Plain);
        let mut renderer = DisplayListRenderer::new();
        renderer.build_scene(&ctx).unwrap();
        renderer.take_commands()
    }

    fn color_of(cmd: &DrawCommand) -> SerializableColor {
        match cmd {
            DrawCommand::Fill { color, .. }
            | DrawCommand::Stroke { color, .. }
            | DrawCommand::Label { color, .. } => (*color).into(),
        }
    }

    #[test]
    fn test_empty_diagram() {
        assert_eq!(record(&Diagram::new()).len(), 1);
    }

    #[test]
    fn test_player_has_number_label() {
        let mut diagram = Diagram::new();
        diagram.add_element(ElementKind::Player, Point::new(0.5, 0.5), TeamColor::Home);
        let cmds = record(&diagram);
        let label = cmds.iter().find_map(|c| match c {
            DrawCommand::Label { text, position, .. } => Some((text.clone(), *position)),
            _ => None,
        });
        assert_eq!(label, Some(("1".to_string(), Point::new(180.0, 270.0))));
    }

    #[test]
    fn test_every_kind_draws() {
        for kind in [
            ElementKind::Player,
            ElementKind::Goalkeeper,
            ElementKind::Ball,
            ElementKind::Cone,
            ElementKind::Flag,
            ElementKind::Mannequin,
            ElementKind::Ladder,
            ElementKind::Goal,
            ElementKind::MiniGoal,
        ] {
            let mut diagram = Diagram::new();
            diagram.add_element(kind, Point::new(0.5, 0.5), TeamColor::Away);
            assert!(record(&diagram).len() > 1, "{kind:?} drew nothing");
        }
    }

    #[test]
    fn test_arrow_has_head() {
        let mut diagram = Diagram::new();
        let red = SerializableColor::new(255, 0, 0, 255);
        diagram
            .add_path(
                vec![Point::new(0.2, 0.2), Point::new(0.8, 0.2)],
                &PathAttrs::new(PathType::Arrow).with_color(red),
            )
            .unwrap();
        let strokes = record(&diagram)
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke { .. }) && color_of(c) == red)
            .count();
        assert_eq!(strokes, 2);
    }

    fn first_stroke_is_dashed(attrs: &PathAttrs) -> bool {
        let mut diagram = Diagram::new();
        diagram
            .add_path(vec![Point::new(0.2, 0.2), Point::new(0.8, 0.6)], attrs)
            .unwrap();
        let cmds = record(&diagram);
        let DrawCommand::Stroke { style, .. } = &cmds[1] else {
            panic!("expected stroke");
        };
        !style.dash_pattern.is_empty()
    }

    #[test]
    fn test_dash_follows_path_attrs() {
        assert!(first_stroke_is_dashed(&PathAttrs::new(PathType::PassLine)));
        assert!(!first_stroke_is_dashed(&PathAttrs::new(PathType::Line)));
        assert!(first_stroke_is_dashed(&PathAttrs::new(PathType::Line).with_dashed(true)));
        assert!(!first_stroke_is_dashed(
            &PathAttrs::new(PathType::PassLine).with_dashed(false)
        ));
    }

    #[test]
    fn test_zone_is_filled_translucent() {
        let mut diagram = Diagram::new();
        diagram
            .add_path(
                vec![Point::new(0.2, 0.2), Point::new(0.8, 0.2), Point::new(0.5, 0.6)],
                &PathAttrs::new(PathType::Zone),
            )
            .unwrap();
        let cmds = record(&diagram);
        assert!(matches!(cmds[1], DrawCommand::Fill { .. }));
        assert!(color_of(&cmds[1]).a < 255);
        assert!(matches!(cmds[2], DrawCommand::Stroke { .. }));
    }

    #[test]
    fn test_dotted_run_is_dots() {
        let mut diagram = Diagram::new();
        diagram
            .add_path(
                vec![Point::new(0.1, 0.5), Point::new(0.9, 0.5)],
                &PathAttrs::new(PathType::DottedRun),
            )
            .unwrap();
        let cmds = record(&diagram);
        assert!(matches!(cmds[1], DrawCommand::Fill { .. }));
        // Dots, then the arrowhead.
        assert_eq!(cmds.len(), 3);
    }

    #[test]
    fn test_ball_painted_over_later_path() {
        let mut diagram = Diagram::new();
        diagram.add_element(ElementKind::Ball, Point::new(0.5, 0.5), TeamColor::Neutral);
        let red = SerializableColor::new(255, 0, 0, 255);
        diagram
            .add_path(
                vec![Point::new(0.4, 0.5), Point::new(0.6, 0.5)],
                &PathAttrs::new(PathType::Line).with_color(red),
            )
            .unwrap();
        let cmds = record(&diagram);
        let path_index = cmds.iter().position(|c| color_of(c) == red).unwrap();
        let ball_index = cmds
            .iter()
            .position(|c| color_of(c) == SerializableColor::black())
            .unwrap();
        assert!(path_index < ball_index);
    }

    #[test]
    fn test_selection_and_preview() {
        let mut session = EditSession::new(BoardConfig::default());
        session.apply(Gesture::Down, ToolKind::PlacePlayer, Point::new(0.5, 0.5));
        session.apply(Gesture::Up, ToolKind::PlacePlayer, Point::new(0.5, 0.5));
        session.apply(Gesture::Down, ToolKind::Select, Point::new(0.5, 0.5));
        session.apply(Gesture::Up, ToolKind::Select, Point::new(0.5, 0.5));
        assert!(session.selected().is_some());

        let selection: SerializableColor = Color::from_rgba8(59, 130, 246, 255).into();
        let cmds = render_diagram(&session).unwrap();
        assert!(cmds.iter().any(|c| color_of(c) == selection));

        session.apply(Gesture::Down, ToolKind::Arrow, Point::new(0.2, 0.2));
        session.apply(Gesture::Move, ToolKind::Arrow, Point::new(0.8, 0.8));
        let preview: SerializableColor = Color::from_rgba8(255, 255, 255, 150).into();
        let cmds = render_diagram(&session).unwrap();
        assert!(cmds.iter().any(|c| color_of(c) == preview));
        assert!(session.diagram().paths().is_empty());
    }

    #[test]
    fn test_invalid_surface() {
        let scene =
            build_scene(Category::Passing, ActorMode::Partner, &EquipmentSet::new()).unwrap();
        let frame = advance(&scene, 0.0);
        let result = render_frame(&scene, &frame, Size::new(0.0, 540.0));
        assert!(matches!(result, Err(RendererError::InvalidSurface(_))));
    }

    #[test]
    fn test_frame_draws_tokens_at_poses() {
        let scene =
            build_scene(Category::Passing, ActorMode::Partner, &EquipmentSet::new()).unwrap();
        let frame = advance(&scene, 0.5);
        let cmds = render_frame(&scene, &frame, SIZE).unwrap();
        let labels: Vec<Point> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { position, .. } => Some(*position),
                _ => None,
            })
            .collect();
        assert_eq!(labels.len(), 2);
        for actor in scene.actors_of(ElementKind::Player) {
            let expected = frame.pose(actor.element.id()).unwrap().position;
            let px = Point::new(expected.x * SIZE.width, expected.y * SIZE.height);
            assert!(labels.iter().any(|l| l.distance(px) < 1e-9));
        }
    }
}
