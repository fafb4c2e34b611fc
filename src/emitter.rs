//! Delivery of session events to the telemetry and notification sinks.
//!
//! Delivery is best effort and at most once: every failure is logged and
//! reported back, nothing is retried, and session state is never touched.

use crate::{
    config::{DeviceConfig, NotifierConfig},
    lookup::Lookups,
    notify::{render_end_summary, Notifier},
    session::SessionEvent,
    telemetry::{TelemetryPayload, TelemetrySink},
};
use log::{debug, error, warn};

/// Outcome of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Delivered successfully
    Sent,
    /// Attempted and failed
    Failed(String),
    /// No sink configured, or nothing to send for this event
    Skipped,
}

impl Delivery {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Per-event delivery outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub telemetry: Delivery,
    pub notification: Delivery,
}

/// Turns session events into telemetry payloads and chat messages
pub struct EventEmitter {
    device: DeviceConfig,
    channel_id: String,
    pin: bool,
    telemetry: Option<Box<dyn TelemetrySink>>,
    notifier: Option<Box<dyn Notifier>>,
}

impl EventEmitter {
    /// Create an emitter with no sinks attached
    #[must_use]
    pub fn new(device: DeviceConfig, notifier_config: &NotifierConfig) -> Self {
        Self {
            device,
            channel_id: notifier_config.channel_id.clone(),
            pin: notifier_config.pin,
            telemetry: None,
            notifier: None,
        }
    }

    /// Attach a telemetry sink
    #[must_use]
    pub fn with_telemetry(mut self, sink: Box<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Attach a chat notifier
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Deliver one event to every configured sink
    pub fn emit(&mut self, event: &SessionEvent, lookups: &Lookups) -> DeliveryReport {
        debug!("Emitting {}", event.kind());

        let telemetry = match self.telemetry.as_mut() {
            Some(sink) => {
                let payload = TelemetryPayload::from_event(event, &self.device);
                match sink.send(&payload) {
                    Ok(()) => Delivery::Sent,
                    Err(e) => {
                        error!("Error sending {} to {}: {}", event.kind(), sink.name(), e);
                        Delivery::Failed(e.to_string())
                    }
                }
            }
            None => Delivery::Skipped,
        };

        let notification = match (event, self.notifier.as_mut()) {
            (SessionEvent::Ended(ended), Some(notifier)) => {
                let text = render_end_summary(ended, lookups);
                match notifier.send_message(&self.channel_id, &text, self.pin) {
                    Ok(()) => Delivery::Sent,
                    Err(e) => {
                        warn!("Error sending message to channel {}: {}", self.channel_id, e);
                        Delivery::Failed(e.to_string())
                    }
                }
            }
            _ => Delivery::Skipped,
        };

        DeliveryReport { telemetry, notification }
    }
}
