//! Frame sources supplying per-frame marker detections.
//!
//! A source yields `Ok(Some(detections))` for every frame (possibly empty),
//! `Ok(None)` at end of stream, and an error when a read fails. The
//! application treats a failed read as end of stream.

/// Predefined ArUco dictionaries
pub mod dictionary;

/// Recorded detections replayed from a JSON-lines file
pub mod replay;

/// Live capture through `OpenCV` with the ArUco detector
#[cfg(feature = "camera")]
pub mod camera;

pub use dictionary::MarkerDictionary;
pub use replay::ReplaySource;

#[cfg(feature = "camera")]
pub use camera::CameraSource;

use crate::{frame::Detections, Result};

/// Trait for all frame sources
pub trait FrameSource {
    /// Read the next frame's detections
    fn next_frame(&mut self) -> Result<Option<Detections>>;

    /// Get source name
    fn name(&self) -> &str;
}

/// In-memory source, mostly useful for tests and benchmarks
pub struct VecSource {
    frames: std::collections::VecDeque<Detections>,
}

impl VecSource {
    #[must_use]
    pub fn new(frames: Vec<Detections>) -> Self {
        Self { frames: frames.into() }
    }
}

impl FrameSource for VecSource {
    fn next_frame(&mut self) -> Result<Option<Detections>> {
        Ok(self.frames.pop_front())
    }

    fn name(&self) -> &str {
        "VecSource"
    }
}
