//! Live capture through `OpenCV`.

use super::{FrameSource, MarkerDictionary};
use crate::{
    error::{AppError, Result},
    frame::{Detections, MarkerDetection},
};
use log::{debug, info, warn};
use opencv::{
    core::{Mat, Point2f, Vector},
    imgproc,
    objdetect::{self, ArucoDetector, DetectorParameters, PredefinedDictionaryType, RefineParameters},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};

/// Camera or stream source running the ArUco detector on every frame
pub struct CameraSource {
    capture: VideoCapture,
    detector: ArucoDetector,
    frame: Mat,
    gray: Mat,
}

impl CameraSource {
    /// Open `source`: a camera index such as `"0"`, or a file or stream URL
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened or the detector fails to build.
    pub fn open(source: &str, dictionary: MarkerDictionary) -> Result<Self> {
        let capture = if let Ok(index) = source.parse::<i32>() {
            info!("Opening camera {}", index);
            let mut cap = VideoCapture::new(index, videoio::CAP_ANY)?;
            cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
            cap
        } else {
            info!("Opening video stream: {}", source);
            VideoCapture::from_file(source, videoio::CAP_ANY)?
        };

        if !capture.is_opened()? {
            return Err(AppError::CaptureError(format!("Cannot open video source {source}")));
        }

        info!("Detecting markers from dictionary {}", dictionary);
        let dictionary = objdetect::get_predefined_dictionary(predefined_type(dictionary))?;
        let parameters = DetectorParameters::default()?;
        let refine = RefineParameters::new(10.0, 3.0, true)?;
        let detector = ArucoDetector::new(&dictionary, &parameters, refine)?;

        Ok(Self {
            capture,
            detector,
            frame: Mat::default(),
            gray: Mat::default(),
        })
    }

    fn detect(&mut self) -> Result<Detections> {
        imgproc::cvt_color(&self.frame, &mut self.gray, imgproc::COLOR_BGR2GRAY, 0)?;

        let mut corners: Vector<Vector<Point2f>> = Vector::new();
        let mut ids: Vector<i32> = Vector::new();
        let mut rejected: Vector<Vector<Point2f>> = Vector::new();
        self.detector
            .detect_markers(&self.gray, &mut corners, &mut ids, &mut rejected)?;

        let mut detections = Vec::with_capacity(ids.len());
        for (id, polygon) in ids.iter().zip(corners.iter()) {
            let Ok(id) = u32::try_from(id) else {
                warn!("Ignoring marker with negative id {}", id);
                continue;
            };
            if polygon.len() != 4 {
                warn!("Ignoring marker {} with {} corners", id, polygon.len());
                continue;
            }
            let mut points = [[0.0_f32; 2]; 4];
            for (slot, p) in points.iter_mut().zip(polygon.iter()) {
                *slot = [p.x, p.y];
            }
            detections.push(MarkerDetection::new(id, points));
        }

        debug!("Detected {} markers", detections.len());
        Ok(detections)
    }
}

fn predefined_type(dictionary: MarkerDictionary) -> PredefinedDictionaryType {
    match dictionary {
        MarkerDictionary::Dict4x4_50 => PredefinedDictionaryType::DICT_4X4_50,
        MarkerDictionary::Dict4x4_100 => PredefinedDictionaryType::DICT_4X4_100,
        MarkerDictionary::Dict4x4_250 => PredefinedDictionaryType::DICT_4X4_250,
        MarkerDictionary::Dict4x4_1000 => PredefinedDictionaryType::DICT_4X4_1000,
        MarkerDictionary::Dict5x5_50 => PredefinedDictionaryType::DICT_5X5_50,
        MarkerDictionary::Dict5x5_100 => PredefinedDictionaryType::DICT_5X5_100,
        MarkerDictionary::Dict5x5_250 => PredefinedDictionaryType::DICT_5X5_250,
        MarkerDictionary::Dict5x5_1000 => PredefinedDictionaryType::DICT_5X5_1000,
        MarkerDictionary::Dict6x6_50 => PredefinedDictionaryType::DICT_6X6_50,
        MarkerDictionary::Dict6x6_100 => PredefinedDictionaryType::DICT_6X6_100,
        MarkerDictionary::Dict6x6_250 => PredefinedDictionaryType::DICT_6X6_250,
        MarkerDictionary::Dict6x6_1000 => PredefinedDictionaryType::DICT_6X6_1000,
        MarkerDictionary::Dict7x7_50 => PredefinedDictionaryType::DICT_7X7_50,
        MarkerDictionary::Dict7x7_100 => PredefinedDictionaryType::DICT_7X7_100,
        MarkerDictionary::Dict7x7_250 => PredefinedDictionaryType::DICT_7X7_250,
        MarkerDictionary::Dict7x7_1000 => PredefinedDictionaryType::DICT_7X7_1000,
        MarkerDictionary::ArucoOriginal => PredefinedDictionaryType::DICT_ARUCO_ORIGINAL,
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<Detections>> {
        if !self.capture.read(&mut self.frame)? || self.frame.empty() {
            return Err(AppError::CaptureError("Failed to capture frame".to_string()));
        }
        self.detect().map(Some)
    }

    fn name(&self) -> &str {
        "CameraSource"
    }
}
