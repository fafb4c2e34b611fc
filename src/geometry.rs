//! Pixel-space zone geometry.
//!
//! Zones are rebuilt from the boundary marker centers every frame and are
//! never cached, since the camera or the markers may move between frames.

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub min: Point,
    pub max: Point,
}

impl Zone {
    /// Bounding rectangle of two points
    #[must_use]
    pub fn bounding(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Grow the rectangle outward by `padding` pixels on every side
    #[must_use]
    pub fn padded(self, padding: i32) -> Self {
        Self {
            min: Point::new(self.min.x - padding, self.min.y - padding),
            max: Point::new(self.max.x + padding, self.max.y + padding),
        }
    }

    /// Whether `point` lies inside the rectangle, edges included
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }
}

/// Trainer and student zones computed for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zones {
    pub trainer: Zone,
    pub student: Zone,
}

/// Build both zones from the four boundary marker centers.
///
/// `c1`/`c2` bound the trainer zone as-is, `c3`/`c4` bound the student zone,
/// which is then padded to absorb center jitter and hand occlusion while a
/// card is being shown.
#[must_use]
pub fn compute_zones(c1: Point, c2: Point, c3: Point, c4: Point, padding: i32) -> Zones {
    Zones {
        trainer: Zone::bounding(c1, c2),
        student: Zone::bounding(c3, c4).padded(padding),
    }
}
