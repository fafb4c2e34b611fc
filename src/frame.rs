//! Reduction of raw per-frame marker detections into a frame observation.

use crate::{
    constants::{DEFAULT_STUDENT_CORNER_IDS, DEFAULT_TRAINER_CORNER_IDS, MARKER_CORNERS},
    geometry::{compute_zones, Point, Zones},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker identifier as reported by the detector
pub type MarkerId = u32;

/// One detected marker: its id and the four corners of its polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDetection {
    pub id: MarkerId,
    pub corners: [[f32; 2]; MARKER_CORNERS],
}

impl MarkerDetection {
    #[must_use]
    pub const fn new(id: MarkerId, corners: [[f32; 2]; MARKER_CORNERS]) -> Self {
        Self { id, corners }
    }

    /// Mean of the corner coordinates, truncated to whole pixels
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // truncation to pixels is intended
    pub fn center(&self) -> Point {
        let n = MARKER_CORNERS as f32;
        let x = self.corners.iter().map(|c| c[0]).sum::<f32>() / n;
        let y = self.corners.iter().map(|c| c[1]).sum::<f32>() / n;
        Point::new(x as i32, y as i32)
    }
}

/// All detections of one frame, in detector order
pub type Detections = Vec<MarkerDetection>;

/// Marker ids delimiting the two zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryIds {
    pub trainer: [MarkerId; 2],
    pub student: [MarkerId; 2],
}

impl Default for BoundaryIds {
    fn default() -> Self {
        Self {
            trainer: DEFAULT_TRAINER_CORNER_IDS,
            student: DEFAULT_STUDENT_CORNER_IDS,
        }
    }
}

impl BoundaryIds {
    /// All four ids, trainer pair first
    #[must_use]
    pub const fn all(&self) -> [MarkerId; 4] {
        [self.trainer[0], self.trainer[1], self.student[0], self.student[1]]
    }

    #[must_use]
    pub fn contains(&self, id: MarkerId) -> bool {
        self.all().contains(&id)
    }
}

/// Structured view of a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameObservation {
    visible: Vec<MarkerId>,
    boundary: HashMap<MarkerId, Point>,
    centers: Vec<(MarkerId, Point)>,
}

impl FrameObservation {
    /// Interpret raw detections against the configured boundary ids.
    ///
    /// A boundary id detected more than once keeps its first center.
    #[must_use]
    pub fn interpret(detections: &[MarkerDetection], boundary_ids: &BoundaryIds) -> Self {
        let mut observation = Self {
            visible: Vec::with_capacity(detections.len()),
            boundary: HashMap::with_capacity(4),
            centers: Vec::with_capacity(detections.len()),
        };

        for detection in detections {
            let center = detection.center();
            observation.visible.push(detection.id);
            observation.centers.push((detection.id, center));
            if boundary_ids.contains(detection.id) {
                observation.boundary.entry(detection.id).or_insert(center);
            }
        }

        observation
    }

    /// Visible ids in detection order
    #[must_use]
    pub fn visible_ids(&self) -> &[MarkerId] {
        &self.visible
    }

    #[must_use]
    pub fn is_visible(&self, id: MarkerId) -> bool {
        self.visible.contains(&id)
    }

    /// Centers of the boundary markers seen in this frame
    #[must_use]
    pub fn boundary_centers(&self) -> &HashMap<MarkerId, Point> {
        &self.boundary
    }

    /// Every detected marker with its center, in detection order
    #[must_use]
    pub fn centers(&self) -> &[(MarkerId, Point)] {
        &self.centers
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Zones for this frame, or `None` unless all four boundary markers are visible
    #[must_use]
    pub fn zones(&self, boundary_ids: &BoundaryIds, padding: i32) -> Option<Zones> {
        let [t1, t2, s1, s2] = boundary_ids.all();
        let center = |id: MarkerId| self.boundary.get(&id).copied();
        Some(compute_zones(center(t1)?, center(t2)?, center(s1)?, center(s2)?, padding))
    }
}
