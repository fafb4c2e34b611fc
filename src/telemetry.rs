//! Telemetry payloads and the HTTP sink that posts them.

use crate::{
    config::DeviceConfig,
    error::{Error, Result},
    frame::MarkerId,
    session::SessionEvent,
};
use log::{debug, info};
use serde::Serialize;
use std::time::Duration;

/// Payload posted when a session starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStartPayload {
    pub time: String,
    pub device_name: String,
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "MAC")]
    pub mac: String,
    pub location: String,
    pub trainer_id: MarkerId,
    pub student_id: MarkerId,
    pub class_started: bool,
}

/// Payload posted for every learned card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLearnedPayload {
    pub time: String,
    pub device_id: String,
    pub trainer_id: MarkerId,
    pub student_id: MarkerId,
    pub lesson_card_id: MarkerId,
    pub lesson_card_word: String,
    pub zone: String,
    pub class_started: bool,
    pub lesson_card_count: u32,
}

/// Payload posted when a session ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEndPayload {
    pub time: String,
    pub device_name: String,
    pub trainer_id: MarkerId,
    pub student_id: MarkerId,
    pub lesson_card_count: u32,
    pub class_started: bool,
}

/// Any telemetry payload, serialized without a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TelemetryPayload {
    SessionStart(SessionStartPayload),
    CardLearned(CardLearnedPayload),
    SessionEnd(SessionEndPayload),
}

impl TelemetryPayload {
    /// Build the payload for a session event
    #[must_use]
    pub fn from_event(event: &SessionEvent, device: &DeviceConfig) -> Self {
        match event {
            SessionEvent::Started(e) => Self::SessionStart(SessionStartPayload {
                time: e.time.to_string(),
                device_name: device.name.clone(),
                ip: device.ip.clone(),
                mac: device.mac.clone(),
                location: device.location.clone(),
                trainer_id: e.trainer_id,
                student_id: e.student_id,
                class_started: true,
            }),
            SessionEvent::CardLearned(e) => Self::CardLearned(CardLearnedPayload {
                time: e.time.to_string(),
                device_id: device.name.clone(),
                trainer_id: e.trainer_id,
                student_id: e.student_id,
                lesson_card_id: e.card_id,
                lesson_card_word: e.word.clone(),
                zone: e.zone.to_string(),
                class_started: e.active,
                lesson_card_count: e.count,
            }),
            SessionEvent::Ended(e) => Self::SessionEnd(SessionEndPayload {
                time: e.time.to_string(),
                device_name: device.name.clone(),
                trainer_id: e.trainer_id,
                student_id: e.student_id,
                lesson_card_count: e.count,
                class_started: false,
            }),
        }
    }
}

/// Destination for telemetry payloads
pub trait TelemetrySink: Send {
    /// Deliver one payload; no retries
    fn send(&mut self, payload: &TelemetryPayload) -> Result<()>;

    /// Get sink name
    fn name(&self) -> &str;
}

/// Posts payloads as JSON to an HTTP endpoint
pub struct HttpTelemetry {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTelemetry {
    /// Create a sink for `url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.into() })
    }
}

impl TelemetrySink for HttpTelemetry {
    fn send(&mut self, payload: &TelemetryPayload) -> Result<()> {
        debug!("POST {} {}", self.url, serde_json::to_string(payload)?);
        let response = self.client.post(&self.url).json(payload).send()?;
        let status = response.status();
        info!("Sent ({status}): {}", serde_json::to_string(payload)?);
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::DeliveryError(format!("Telemetry endpoint returned {status}")))
        }
    }

    fn name(&self) -> &str {
        "HttpTelemetry"
    }
}
