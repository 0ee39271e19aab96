//! Playing-surface mapping between normalized and pixel coordinates.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Which half of the (portrait) surface a set of points lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Half {
    /// `y <= 0.5`
    Top,
    /// `y >= 0.5`
    Bottom,
}

/// The playing surface as laid out on screen.
///
/// Diagrams only ever store normalized coordinates; this type converts to
/// pixels at render and hit-test time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Surface size in pixels.
    pub size: Size,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(Size::new(360.0, 540.0))
    }
}

impl Surface {
    pub fn new(size: Size) -> Self {
        Self { size }
    }

    /// Convert a normalized point to pixels.
    pub fn to_pixels(&self, normalized: Point) -> Point {
        Point::new(normalized.x * self.size.width, normalized.y * self.size.height)
    }

    /// Convert a pixel point to normalized coordinates.
    ///
    /// A zero-sized surface maps everything to the origin.
    pub fn to_normalized(&self, pixel: Point) -> Point {
        if self.size.width <= 0.0 || self.size.height <= 0.0 {
            return Point::ZERO;
        }
        Point::new(pixel.x / self.size.width, pixel.y / self.size.height)
    }

    /// Pixel rectangle covering the whole surface.
    pub fn rect(&self) -> Rect {
        self.size.to_rect()
    }

    /// Pixel rectangle covering one half of the surface.
    pub fn half_rect(&self, half: Half) -> Rect {
        let mid = self.size.height / 2.0;
        match half {
            Half::Top => Rect::new(0.0, 0.0, self.size.width, mid),
            Half::Bottom => Rect::new(0.0, mid, self.size.width, self.size.height),
        }
    }
}

/// The half that contains every point, if one does.
///
/// Points exactly on the halfway line belong to both halves.
pub fn confining_half<I>(points: I) -> Option<Half>
where
    I: IntoIterator<Item = Point>,
{
    let (mut top, mut bottom, mut any) = (true, true, false);
    for p in points {
        any = true;
        top &= p.y <= 0.5;
        bottom &= p.y >= 0.5;
    }
    match (any, top, bottom) {
        (false, _, _) => None,
        (true, true, _) => Some(Half::Top),
        (true, false, true) => Some(Half::Bottom),
        _ => None,
    }
}
