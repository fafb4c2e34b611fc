//! Main application module for the classroom tracker.

use crate::{
    capture::{FrameSource, ReplaySource},
    config::Config,
    emitter::{DeliveryReport, EventEmitter},
    error::Result,
    frame::{BoundaryIds, FrameObservation, MarkerDetection},
    lookup::Lookups,
    notify::EitaaNotifier,
    session::{SessionEvent, SessionTracker},
    telemetry::HttpTelemetry,
};
use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use std::time::Instant;

/// Source of the wall-clock time stamped on events
pub type Clock = Box<dyn FnMut() -> NaiveDateTime + Send>;

/// Counters collected over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub sessions_started: u32,
    pub sessions_ended: u32,
    pub cards_learned: u32,
    pub delivery_failures: u32,
}

impl RunSummary {
    fn record(&mut self, event: &SessionEvent, report: &DeliveryReport) {
        match event {
            SessionEvent::Started(_) => self.sessions_started += 1,
            SessionEvent::CardLearned(_) => self.cards_learned += 1,
            SessionEvent::Ended(_) => self.sessions_ended += 1,
        }
        if report.telemetry.is_failed() {
            self.delivery_failures += 1;
        }
        if report.notification.is_failed() {
            self.delivery_failures += 1;
        }
    }
}

/// Main application struct
pub struct ClassroomApp {
    source: Box<dyn FrameSource>,
    lookups: Lookups,
    boundary_ids: BoundaryIds,
    tracker: SessionTracker,
    emitter: EventEmitter,
    clock: Clock,
}

impl ClassroomApp {
    /// Assemble an application from ready-made parts
    #[must_use]
    pub fn new(config: &Config, source: Box<dyn FrameSource>, lookups: Lookups, emitter: EventEmitter) -> Self {
        let boundary_ids = config.markers.boundary_ids();
        Self {
            source,
            lookups,
            boundary_ids,
            tracker: SessionTracker::new(boundary_ids, config.markers.student_zone_padding),
            emitter,
            clock: Box::new(|| Local::now().naive_local()),
        }
    }

    /// Build the application described by `config`: lookups, frame source and sinks
    ///
    /// # Errors
    ///
    /// Returns an error if the lookups cannot be loaded or the frame source cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        info!("Initializing classroom tracker on {}", config.device.name);

        let lookups = Lookups::load(&config.lookups.words_csv, &config.lookups.users_csv)?
            .with_unknown_name(config.lookups.unknown_person_name.clone());
        let source = open_source(config)?;

        let mut emitter = EventEmitter::new(config.device.clone(), &config.notifier);
        if config.telemetry.enabled {
            info!("Telemetry enabled: {}", config.telemetry.url);
            emitter = emitter.with_telemetry(Box::new(HttpTelemetry::new(
                config.telemetry.url.clone(),
                config.telemetry.timeout(),
            )?));
        }
        if config.notifier.enabled {
            match config.notifier.resolved_token() {
                Some(token) => {
                    let notifier = EitaaNotifier::new(&config.notifier.api_base, &token, config.notifier.timeout())?;
                    info!("Notifications enabled for channel {}", config.notifier.channel_id);
                    emitter = emitter.with_notifier(Box::new(notifier));
                }
                None => warn!("Notifier enabled but no token configured, notifications disabled"),
            }
        }

        Ok(Self::new(config, source, lookups, emitter))
    }

    /// Replace the wall clock
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Run the main loop until the source runs dry or fails
    pub fn run(&mut self) -> Result<RunSummary> {
        info!("Program started. Waiting for trainer and student...");

        let start_time = Instant::now();
        let mut summary = RunSummary::default();

        loop {
            let detections = match self.source.next_frame() {
                Ok(Some(detections)) => detections,
                Ok(None) => {
                    info!("End of {} reached", self.source.name());
                    break;
                }
                Err(e) => {
                    warn!("Failed to capture frame: {}", e);
                    break;
                }
            };

            let now = (self.clock)();
            for (event, report) in self.process_frame(&detections, now) {
                summary.record(&event, &report);
            }
            summary.frames += 1;
        }

        info!(
            "Processed {} frames in {:.1}s: {} sessions, {} cards learned",
            summary.frames,
            start_time.elapsed().as_secs_f64(),
            summary.sessions_started,
            summary.cards_learned
        );
        Ok(summary)
    }

    /// Run one frame through the tracker and deliver its events in order
    pub fn process_frame(
        &mut self,
        detections: &[MarkerDetection],
        now: NaiveDateTime,
    ) -> Vec<(SessionEvent, DeliveryReport)> {
        let observation = FrameObservation::interpret(detections, &self.boundary_ids);
        let events = self.tracker.step(&observation, &self.lookups, now);
        if !events.is_empty() {
            debug!("Frame produced {} events", events.len());
        }

        events
            .into_iter()
            .map(|event| {
                let report = self.emitter.emit(&event, &self.lookups);
                (event, report)
            })
            .collect()
    }
}

fn open_source(config: &Config) -> Result<Box<dyn FrameSource>> {
    if let Some(path) = &config.capture.replay {
        return Ok(Box::new(ReplaySource::open(path)?));
    }
    open_camera(config)
}

#[cfg(feature = "camera")]
fn open_camera(config: &Config) -> Result<Box<dyn FrameSource>> {
    let dictionary = config.capture.marker_dictionary()?;
    Ok(Box::new(crate::capture::CameraSource::open(&config.capture.source, dictionary)?))
}

#[cfg(not(feature = "camera"))]
fn open_camera(config: &Config) -> Result<Box<dyn FrameSource>> {
    Err(crate::Error::ConfigError(format!(
        "Cannot open {}: built without the `camera` feature, use a replay file instead",
        config.capture.source
    )))
}
