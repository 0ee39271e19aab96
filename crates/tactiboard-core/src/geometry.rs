//! Geometry kernel: arrowheads, curve smoothing, hit-testing and clamping.
//!
//! Everything here is a pure function. Inputs with fewer than two points are
//! answered with an empty result instead of a panic.

use kurbo::{BezPath, Line, ParamCurve, Point, QuadBez, Vec2};

/// Lower bound of the visible token box (normalized).
pub const CLAMP_MIN: f64 = 0.03;
/// Upper bound of the visible token box (normalized).
pub const CLAMP_MAX: f64 = 0.97;

/// Default arrowhead wing length in pixels.
pub const ARROW_HEAD_LENGTH: f64 = 15.0;
/// Default arrowhead half-angle in degrees.
pub const ARROW_HEAD_HALF_ANGLE_DEG: f64 = 30.0;

/// Bend of a two-point curve, as a fraction of the chord's horizontal extent.
const TWO_POINT_BEND: f64 = 0.3;

/// One piece of a smoothed path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line(Line),
    Quad(QuadBez),
}

impl PathSegment {
    pub fn start(&self) -> Point {
        match self {
            PathSegment::Line(l) => l.p0,
            PathSegment::Quad(q) => q.p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            PathSegment::Line(l) => l.p1,
            PathSegment::Quad(q) => q.p2,
        }
    }

    /// Evaluate the segment at parameter `t` in `[0, 1]`.
    pub fn eval(&self, t: f64) -> Point {
        match self {
            PathSegment::Line(l) => l.eval(t),
            PathSegment::Quad(q) => q.eval(t),
        }
    }

    /// Direction of travel at the end of the segment.
    pub fn end_tangent_origin(&self) -> Point {
        match self {
            PathSegment::Line(l) => l.p0,
            PathSegment::Quad(q) => q.p1,
        }
    }
}

/// Clamp a normalized point into the visible token box.
///
/// Clamping is idempotent: clamping an already-clamped point is a no-op.
pub fn clamp_to_surface(point: Point) -> Point {
    Point::new(
        point.x.clamp(CLAMP_MIN, CLAMP_MAX),
        point.y.clamp(CLAMP_MIN, CLAMP_MAX),
    )
}

/// Whether a normalized point lies on the playing surface at all.
pub fn is_on_surface(point: Point) -> bool {
    (0.0..=1.0).contains(&point.x) && (0.0..=1.0).contains(&point.y)
}

/// Two wing segments forming a "V" at `to`, oriented along `from -> to`.
///
/// Returns `None` when the direction is undefined (`from == to`).
pub fn arrow_head(from: Point, to: Point, length: f64, half_angle_deg: f64) -> Option<[Line; 2]> {
    let dir = to - from;
    if dir.hypot2() < f64::EPSILON {
        return None;
    }
    let back = dir.atan2() + std::f64::consts::PI;
    let half = half_angle_deg.to_radians();
    let left = to + Vec2::from_angle(back - half) * length;
    let right = to + Vec2::from_angle(back + half) * length;
    Some([Line::new(to, left), Line::new(to, right)])
}

/// Arrowhead with the default length and half-angle.
pub fn default_arrow_head(from: Point, to: Point) -> Option<[Line; 2]> {
    arrow_head(from, to, ARROW_HEAD_LENGTH, ARROW_HEAD_HALF_ANGLE_DEG)
}

/// Smooth a polyline with quadratic curves through consecutive midpoints.
///
/// Three or more points: a line to the first midpoint, one quadratic per
/// interior point (the point itself is the control), a line to the last point.
/// Exactly two points: a single quadratic bent perpendicular to the chord.
pub fn smooth_polyline(points: &[Point]) -> Vec<PathSegment> {
    match points.len() {
        0 | 1 => Vec::new(),
        2 => {
            let (a, b) = (points[0], points[1]);
            let chord = b - a;
            let len = chord.hypot();
            let mid = a.midpoint(b);
            let control = if len < f64::EPSILON {
                mid
            } else {
                let normal = Vec2::new(-chord.y, chord.x) / len;
                mid + normal * (TWO_POINT_BEND * chord.x.abs())
            };
            vec![PathSegment::Quad(QuadBez::new(a, control, b))]
        }
        n => {
            let mut segments = Vec::with_capacity(n);
            let mut cursor = points[0].midpoint(points[1]);
            segments.push(PathSegment::Line(Line::new(points[0], cursor)));
            for i in 1..n - 1 {
                let next_mid = points[i].midpoint(points[i + 1]);
                segments.push(PathSegment::Quad(QuadBez::new(cursor, points[i], next_mid)));
                cursor = next_mid;
            }
            segments.push(PathSegment::Line(Line::new(cursor, points[n - 1])));
            segments
        }
    }
}

/// Straight segments between consecutive points.
pub fn straight_segments(points: &[Point]) -> Vec<PathSegment> {
    points
        .windows(2)
        .map(|w| PathSegment::Line(Line::new(w[0], w[1])))
        .collect()
}

/// Build a continuous `BezPath` from a chain of segments.
pub fn segments_to_bez_path(segments: &[PathSegment]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = segments.first() else {
        return path;
    };
    path.move_to(first.start());
    for segment in segments {
        match segment {
            PathSegment::Line(l) => path.line_to(l.p1),
            PathSegment::Quad(q) => path.quad_to(q.p1, q.p2),
        }
    }
    path
}

/// Sample a segment chain into a polyline, `steps` samples per curve.
pub fn flatten_segments(segments: &[PathSegment], steps: usize) -> Vec<Point> {
    let mut points = Vec::new();
    let Some(first) = segments.first() else {
        return points;
    };
    points.push(first.start());
    let steps = steps.max(1);
    for segment in segments {
        match segment {
            PathSegment::Line(l) => points.push(l.p1),
            PathSegment::Quad(q) => {
                for i in 1..=steps {
                    points.push(q.eval(i as f64 / steps as f64));
                }
            }
        }
    }
    points
}

/// Distance from a point to a line segment (a -> b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Even-odd containment test for a closed polygon.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pi.x + (point.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Evenly spaced markers along a polyline, starting at its first point.
pub fn dot_markers(points: &[Point], spacing: f64) -> Vec<Point> {
    if points.len() < 2 || spacing <= 0.0 {
        return Vec::new();
    }
    let mut markers = vec![points[0]];
    // Distance still to travel before the next marker.
    let mut pending = spacing;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let seg_len = a.distance(b);
        let mut walked = 0.0;
        while seg_len - walked >= pending {
            walked += pending;
            markers.push(a.lerp(b, walked / seg_len));
            pending = spacing;
        }
        pending -= seg_len - walked;
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_clamp_bounds() {
        let p = clamp_to_surface(Point::new(-0.5, 1.4));
        assert_eq!(p, Point::new(CLAMP_MIN, CLAMP_MAX));
        let inside = Point::new(0.4, 0.6);
        assert_eq!(clamp_to_surface(inside), inside);
    }

    #[test]
    fn test_clamp_idempotent() {
        for &(x, y) in &[(0.0, 0.0), (0.5, 0.99), (1.2, -3.0), (0.03, 0.97)] {
            let once = clamp_to_surface(Point::new(x, y));
            assert_eq!(clamp_to_surface(once), once);
        }
    }

    #[test]
    fn test_arrow_head_points_back_along_direction() {
        let [left, right] =
            default_arrow_head(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        assert_eq!(left.p0, Point::new(100.0, 0.0));
        assert_eq!(right.p0, Point::new(100.0, 0.0));
        // Both wings sit behind the tip and mirror each other.
        assert!(left.p1.x < 100.0 && right.p1.x < 100.0);
        assert!((left.p1.y + right.p1.y).abs() < 1e-9);
        assert!(((left.p1 - left.p0).hypot() - ARROW_HEAD_LENGTH).abs() < 1e-9);
        let expected_dx = ARROW_HEAD_LENGTH * ARROW_HEAD_HALF_ANGLE_DEG.to_radians().cos();
        assert!((100.0 - left.p1.x - expected_dx).abs() < 1e-9);
    }

    #[test]
    fn test_arrow_head_degenerate() {
        assert!(default_arrow_head(Point::new(5.0, 5.0), Point::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_smooth_polyline_too_few_points() {
        assert!(smooth_polyline(&[]).is_empty());
        assert!(smooth_polyline(&[Point::new(1.0, 1.0)]).is_empty());
    }

    #[test]
    fn test_smooth_two_points_bends_perpendicular() {
        let segs = smooth_polyline(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert_eq!(segs.len(), 1);
        match segs[0] {
            PathSegment::Quad(q) => {
                assert!(approx(q.p1, Point::new(5.0, 3.0)));
                assert!(approx(q.p2, Point::new(10.0, 0.0)));
            }
            PathSegment::Line(_) => panic!("expected quadratic"),
        }
    }

    #[test]
    fn test_smooth_many_points_is_continuous() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 10.0),
        ];
        let segs = smooth_polyline(&pts);
        assert_eq!(segs.len(), pts.len());
        assert!(approx(segs[0].start(), pts[0]));
        assert!(approx(segs.last().unwrap().end(), pts[3]));
        for w in segs.windows(2) {
            assert!(approx(w[0].end(), w[1].start()));
        }
        // Interior points become control points.
        let expected = QuadBez::new(
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(15.0, 5.0),
        );
        assert_eq!(segs[1], PathSegment::Quad(expected));
    }

    #[test]
    fn test_point_to_polyline_dist() {
        let line = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        assert!((point_to_polyline_dist(Point::new(50.0, 20.0), &line) - 20.0).abs() < 1e-9);
        assert!((point_to_polyline_dist(Point::new(-3.0, 4.0), &line) - 5.0).abs() < 1e-9);
        assert!(point_to_polyline_dist(Point::ZERO, &[]).is_infinite());
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Point::new(5.0, 5.0), &square[..2]));
    }

    #[test]
    fn test_dot_markers_spacing() {
        let polyline = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let markers = dot_markers(&polyline, 5.0);
        assert_eq!(markers.len(), 5);
        assert!(approx(markers[2], Point::new(10.0, 0.0)));
        assert!(approx(markers[4], Point::new(10.0, 10.0)));
        assert!(dot_markers(&[Point::ZERO], 5.0).is_empty());
    }

    #[test]
    fn test_segments_to_bez_path() {
        let segs = smooth_polyline(&[
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 0.0),
        ]);
        let path = segments_to_bez_path(&segs);
        // move_to + line + quad + line
        assert_eq!(path.elements().len(), 4);
        assert!(segments_to_bez_path(&[]).elements().is_empty());
    }
}
