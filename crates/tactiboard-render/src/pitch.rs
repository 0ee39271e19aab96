//! Playing-surface background and line markings.

use crate::display_list::DrawCommand;
use crate::renderer::{PitchStyle, RenderContext};
use kurbo::{BezPath, Circle, Line, Point, Rect, Shape, Stroke};
use peniko::Color;
use tactiboard_core::surface::Half;

const TOLERANCE: f64 = 0.1;
const STRIPES: usize = 10;
const LINE_WIDTH: f64 = 2.0;

/// Pitch proportions as fractions of the surface.
const INSET: f64 = 0.02;
const CENTRE_CIRCLE_RADIUS: f64 = 0.15;
const PENALTY_BOX: (f64, f64) = (0.6, 0.17);
const GOAL_AREA: (f64, f64) = (0.3, 0.06);
const PENALTY_SPOT: f64 = 0.12;
const SPOT_RADIUS: f64 = 3.0;

/// Append the pitch for `ctx` to `out`.
pub(crate) fn draw_pitch(ctx: &RenderContext, out: &mut Vec<DrawCommand>) {
    let rect = ctx.surface.rect();
    out.push(DrawCommand::Fill {
        path: rect.to_path(TOLERANCE),
        color: ctx.background_color,
    });

    match ctx.pitch_style {
        PitchStyle::Plain => {}
        PitchStyle::Markings => draw_markings(ctx, out),
        PitchStyle::Striped => {
            draw_stripes(rect, out);
            draw_markings(ctx, out);
        }
    }

    if let Some(half) = ctx.half {
        let hidden = match half {
            Half::Top => Half::Bottom,
            Half::Bottom => Half::Top,
        };
        out.push(DrawCommand::Fill {
            path: ctx.surface.half_rect(hidden).to_path(TOLERANCE),
            color: Color::from_rgba8(0, 0, 0, 90),
        });
    }
}

fn draw_stripes(rect: Rect, out: &mut Vec<DrawCommand>) {
    let band = rect.height() / STRIPES as f64;
    let mut path = BezPath::new();
    for i in (0..STRIPES).step_by(2) {
        let y = rect.y0 + band * i as f64;
        path.extend(Rect::new(rect.x0, y, rect.x1, y + band).path_elements(TOLERANCE));
    }
    out.push(DrawCommand::Fill {
        path,
        color: Color::from_rgba8(255, 255, 255, 18),
    });
}

fn draw_markings(ctx: &RenderContext, out: &mut Vec<DrawCommand>) {
    let size = ctx.surface.size;
    let (w, h) = (size.width, size.height);
    let px = |x: f64, y: f64| Point::new(x * w, y * h);

    let mut lines = BezPath::new();
    let boundary = Rect::from_points(px(INSET, INSET), px(1.0 - INSET, 1.0 - INSET));
    lines.extend(boundary.path_elements(TOLERANCE));
    lines.extend(Line::new(px(INSET, 0.5), px(1.0 - INSET, 0.5)).path_elements(TOLERANCE));
    lines.extend(Circle::new(px(0.5, 0.5), CENTRE_CIRCLE_RADIUS * w).path_elements(TOLERANCE));

    let mut spots = BezPath::new();
    spots.extend(Circle::new(px(0.5, 0.5), SPOT_RADIUS).path_elements(TOLERANCE));

    // Top end grows downward from the goal line, bottom end upward.
    for (goal_line, dir) in [(INSET, 1.0), (1.0 - INSET, -1.0)] {
        for (width, depth) in [PENALTY_BOX, GOAL_AREA] {
            let box_rect = Rect::from_points(
                px(0.5 - width / 2.0, goal_line),
                px(0.5 + width / 2.0, goal_line + dir * depth),
            );
            lines.extend(box_rect.path_elements(TOLERANCE));
        }
        let spot = px(0.5, goal_line + dir * PENALTY_SPOT);
        spots.extend(Circle::new(spot, SPOT_RADIUS).path_elements(TOLERANCE));
    }

    out.push(DrawCommand::Stroke {
        path: lines,
        color: ctx.line_color,
        style: Stroke::new(LINE_WIDTH),
    });
    out.push(DrawCommand::Fill {
        path: spots,
        color: ctx.line_color,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use tactiboard_core::Diagram;

    fn commands(style: PitchStyle, half: Option<Half>) -> Vec<DrawCommand> {
        let diagram = Diagram::new();
        let ctx = RenderContext::diagram(&diagram, Size::new(360.0, 540.0))
            .with_pitch(style)
            .with_half(half);
        let mut out = Vec::new();
        draw_pitch(&ctx, &mut out);
        out
    }

    #[test]
    fn test_plain_is_background_only() {
        assert_eq!(commands(PitchStyle::Plain, None).len(), 1);
    }

    #[test]
    fn test_markings_and_stripes() {
        assert_eq!(commands(PitchStyle::Markings, None).len(), 3);
        assert_eq!(commands(PitchStyle::Striped, None).len(), 4);
    }

    #[test]
    fn test_half_shades_other_half() {
        let out = commands(PitchStyle::Plain, Some(Half::Top));
        assert_eq!(out.len(), 2);
        let DrawCommand::Fill { path, .. } = &out[1] else {
            panic!("expected fill");
        };
        let bounds = path.bounding_box();
        assert_eq!(bounds.y0, 270.0);
        assert_eq!(bounds.y1, 540.0);
    }
}
