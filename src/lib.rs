//! Classroom session tracking from ArUco marker detections.
//!
//! Two markers delimit a trainer zone, two delimit a student zone, and every
//! other marker is either a person or a word flashcard. This library turns the
//! noisy per-frame marker detections into discrete session events:
//!
//! 1. The frame interpreter reduces raw detections to visible ids and centers
//! 2. Zones are rebuilt from the four boundary markers every frame
//! 3. The session tracker starts, advances and ends sessions
//! 4. The event emitter posts telemetry and, at session end, a chat summary
//!
//! Timestamps use the Jalali calendar (`YYYY-MM-DDTHH:MM:SS`).
//!
//! # Examples
//!
//! ## Tracking a Session
//!
//! ```
//! use aruco_classroom::{
//!     frame::{BoundaryIds, FrameObservation, MarkerDetection},
//!     lookup::Lookups,
//!     session::{SessionEvent, SessionTracker},
//! };
//! use chrono::NaiveDate;
//! use std::collections::HashMap;
//!
//! let square = |id, x: f32, y: f32| {
//!     MarkerDetection::new(id, [[x - 5.0, y - 5.0], [x + 5.0, y - 5.0], [x + 5.0, y + 5.0], [x - 5.0, y + 5.0]])
//! };
//! let lookups = Lookups::new(
//!     HashMap::from([(1, "apple".to_string())]),
//!     HashMap::from([(10, "Ahmadi".to_string()), (11, "Karimi".to_string())]),
//! );
//! let mut tracker = SessionTracker::default();
//! let now = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap().and_hms_opt(9, 0, 0).unwrap();
//!
//! let frame = vec![
//!     square(34, 0.0, 0.0),
//!     square(35, 100.0, 100.0),
//!     square(36, 300.0, 300.0),
//!     square(37, 400.0, 400.0),
//!     square(10, 50.0, 50.0),
//!     square(11, 350.0, 350.0),
//! ];
//! let observation = FrameObservation::interpret(&frame, &BoundaryIds::default());
//! let events = tracker.step(&observation, &lookups, now);
//!
//! assert!(matches!(events[0], SessionEvent::Started(ref e) if e.trainer_id == 10 && e.student_id == 11));
//! assert_eq!(tracker.state().trainer_id(), Some(10));
//! ```
//!
//! ## Jalali Dates
//!
//! ```
//! use aruco_classroom::calendar::gregorian_to_jalali;
//!
//! assert_eq!(gregorian_to_jalali(2024, 3, 20), (1403, 1, 1));
//! ```

/// Gregorian to Jalali conversion and timestamp rendering
pub mod calendar;

/// Zone rectangles and point membership
pub mod geometry;

/// Per-frame detection interpretation
pub mod frame;

/// Id to word / id to name lookup tables
pub mod lookup;

/// Session lifecycle state machine
pub mod session;

/// Telemetry payloads and HTTP sink
pub mod telemetry;

/// End-of-class chat notifications
pub mod notify;

/// Delivery of session events to the sinks
pub mod emitter;

/// Frame sources (replay files, live camera)
pub mod capture;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
