//! Animation clock for generated scenes.
//!
//! Positions are a pure function of `(scene, t)`. [`AnimationClock`] only
//! holds the advancing time, so pausing, scrubbing and resetting are trivial.

use crate::geometry::{PathSegment, polyline_length, smooth_polyline, straight_segments};
use crate::model::ElementId;
use crate::scene::{Interpolation, MotionPath, RepeatBehavior, Scene};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where one element is drawn at a moment in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub rotation_deg: f64,
}

/// Poses of every scene element at time `t`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub t: f64,
    pub poses: BTreeMap<ElementId, Pose>,
}

impl Frame {
    pub fn pose(&self, id: ElementId) -> Option<&Pose> {
        self.poses.get(&id)
    }
}

/// Compute the frame of `scene` at `t` seconds. Static elements keep their
/// start position.
pub fn advance(scene: &Scene, t: f64) -> Frame {
    let poses = scene
        .actors
        .iter()
        .map(|actor| {
            let element = &actor.element;
            let position = actor
                .motion
                .as_ref()
                .and_then(|m| m.position_at(t))
                .unwrap_or(element.position());
            let pose = Pose {
                position,
                rotation_deg: element.rotation,
            };
            (element.id(), pose)
        })
        .collect();
    Frame { t, poses }
}

impl MotionPath {
    /// Fraction of the way along the waypoints at time `t`, in `[0, 1]`.
    pub fn progress(&self, t: f64) -> f64 {
        let d = self.duration_seconds;
        if d.is_nan() || d <= 0.0 || !t.is_finite() {
            return 0.0;
        }
        match self.repeat {
            RepeatBehavior::Loop => t.rem_euclid(d) / d,
            RepeatBehavior::PingPong => {
                let phase = t.rem_euclid(2.0 * d);
                if phase <= d { phase / d } else { (2.0 * d - phase) / d }
            }
        }
    }

    /// Position at time `t`. Every segment between waypoints takes the same
    /// share of the duration.
    pub fn position_at(&self, t: f64) -> Option<Point> {
        match self.waypoints.as_slice() {
            [] => None,
            [only] => Some(*only),
            waypoints => {
                let segments = match self.interpolation {
                    Interpolation::Linear => straight_segments(waypoints),
                    Interpolation::Curved => smooth_polyline(waypoints),
                };
                Some(sample_segments(&segments, self.progress(t)))
            }
        }
    }
}

fn sample_segments(segments: &[PathSegment], u: f64) -> Point {
    let n = segments.len();
    let scaled = u.clamp(0.0, 1.0) * n as f64;
    let index = (scaled.floor() as usize).min(n - 1);
    segments[index].eval(scaled - index as f64)
}

/// Marker position along an in-progress stroke, travelling start to end once
/// every `period` seconds at constant speed.
pub fn trace_stroke(points: &[Point], t: f64, period: f64) -> Option<Point> {
    let (&first, _) = points.split_first()?;
    let total = polyline_length(points);
    if total <= 0.0 {
        return Some(first);
    }
    if period.is_nan() || period <= 0.0 {
        return points.last().copied();
    }
    let mut remaining = t.rem_euclid(period) / period * total;
    for w in points.windows(2) {
        let len = w[0].distance(w[1]);
        if remaining <= len && len > 0.0 {
            return Some(w[0].lerp(w[1], remaining / len));
        }
        remaining -= len;
    }
    points.last().copied()
}

/// Playback state for a scene: time, speed and pause.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationClock {
    t: f64,
    playing: bool,
    speed: f64,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self {
            t: 0.0,
            playing: true,
            speed: 1.0,
        }
    }
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    /// Advance by `dt` real seconds. Returns the new time.
    pub fn tick(&mut self, dt: f64) -> f64 {
        if self.playing && dt.is_finite() {
            self.t += dt * self.speed;
        }
        self.t
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        self.playing = true;
    }

    pub fn reset(&mut self) {
        self.t = 0.0;
    }

    pub fn seek(&mut self, t: f64) {
        if t.is_finite() {
            self.t = t;
        }
    }

    /// Frame of `scene` at the current time.
    pub fn frame(&self, scene: &Scene) -> Frame {
        advance(scene, self.t)
    }
}
