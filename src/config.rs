//! Configuration management for the classroom tracker

use crate::{
    constants::{
        DEFAULT_CHANNEL_ID, DEFAULT_DEVICE_IP, DEFAULT_DEVICE_LOCATION, DEFAULT_DEVICE_MAC, DEFAULT_DEVICE_NAME,
        DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_NOTIFIER_API_BASE, DEFAULT_STUDENT_CORNER_IDS,
        DEFAULT_STUDENT_ZONE_PADDING, DEFAULT_TELEMETRY_URL, DEFAULT_TRAINER_CORNER_IDS, NOTIFIER_TOKEN_ENV,
        UNKNOWN_PERSON_NAME,
    },
    capture::MarkerDictionary,
    frame::{BoundaryIds, MarkerId},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Duration,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identity of this capture device
    pub device: DeviceConfig,

    /// Boundary marker ids and zone padding
    pub markers: MarkerConfig,

    /// Lookup table locations
    pub lookups: LookupConfig,

    /// Telemetry endpoint
    pub telemetry: TelemetryConfig,

    /// Chat notification endpoint
    pub notifier: NotifierConfig,

    /// Frame source
    pub capture: CaptureConfig,
}

/// Device identity reported in telemetry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub name: String,
    pub ip: String,
    pub mac: String,
    pub location: String,
}

/// Zone marker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Two markers bounding the trainer zone
    pub trainer_corner_ids: [MarkerId; 2],

    /// Two markers bounding the student zone
    pub student_corner_ids: [MarkerId; 2],

    /// Outward padding of the student zone in pixels
    pub student_zone_padding: i32,
}

/// CSV lookup tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// `id,word` table
    pub words_csv: PathBuf,

    /// `id,lastname` table
    pub users_csv: PathBuf,

    /// Name shown for people missing from the users table
    pub unknown_person_name: String,
}

/// Telemetry sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub url: String,
    pub timeout_secs: u64,
}

/// Chat notifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub enabled: bool,
    pub api_base: String,

    /// Bot token; falls back to the `ARUCO_CLASSROOM_NOTIFIER_TOKEN` variable
    pub token: String,
    pub channel_id: String,
    pub pin: bool,
    pub timeout_secs: u64,
}

/// Frame source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera index, stream URL or video file
    pub source: String,

    /// Replay file of recorded detections; takes precedence over `source`
    pub replay: Option<PathBuf>,

    /// ArUco dictionary the markers are printed from, e.g. `4x4_100`
    pub dictionary: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DEVICE_NAME.to_string(),
            ip: DEFAULT_DEVICE_IP.to_string(),
            mac: DEFAULT_DEVICE_MAC.to_string(),
            location: DEFAULT_DEVICE_LOCATION.to_string(),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            trainer_corner_ids: DEFAULT_TRAINER_CORNER_IDS,
            student_corner_ids: DEFAULT_STUDENT_CORNER_IDS,
            student_zone_padding: DEFAULT_STUDENT_ZONE_PADDING,
        }
    }
}

impl MarkerConfig {
    #[must_use]
    pub fn boundary_ids(&self) -> BoundaryIds {
        BoundaryIds {
            trainer: self.trainer_corner_ids,
            student: self.student_corner_ids,
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            words_csv: PathBuf::from("id_words.csv"),
            users_csv: PathBuf::from("user_ids.csv"),
            unknown_person_name: UNKNOWN_PERSON_NAME.to_string(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_TELEMETRY_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl TelemetryConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: DEFAULT_NOTIFIER_API_BASE.to_string(),
            token: String::new(),
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            pin: true,
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl NotifierConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured token, or the one from the environment
    #[must_use]
    pub fn resolved_token(&self) -> Option<String> {
        if self.token.is_empty() {
            std::env::var(NOTIFIER_TOKEN_ENV).ok().filter(|t| !t.is_empty())
        } else {
            Some(self.token.clone())
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: "0".to_string(),
            replay: None,
            dictionary: MarkerDictionary::default().to_string(),
        }
    }
}

impl CaptureConfig {
    /// Parsed marker dictionary
    ///
    /// # Errors
    ///
    /// Returns an error if the dictionary name is unknown.
    pub fn marker_dictionary(&self) -> Result<MarkerDictionary> {
        self.dictionary.parse()
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)?;

        Ok(())
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let ids = self.markers.boundary_ids().all();
        if ids.iter().collect::<HashSet<_>>().len() != ids.len() {
            return Err(Error::ConfigError(format!(
                "Boundary marker ids must be distinct, got {:?}",
                ids
            )));
        }
        if self.markers.student_zone_padding < 0 {
            return Err(Error::ConfigError(
                "Student zone padding must not be negative".to_string(),
            ));
        }

        if self.telemetry.enabled && self.telemetry.url.trim().is_empty() {
            return Err(Error::ConfigError(
                "Telemetry URL must be set when telemetry is enabled".to_string(),
            ));
        }
        if self.notifier.enabled && self.notifier.channel_id.trim().is_empty() {
            return Err(Error::ConfigError(
                "Channel id must be set when notifications are enabled".to_string(),
            ));
        }

        let dictionary = self
            .capture
            .marker_dictionary()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        let largest_id = ids.iter().copied().max().unwrap_or(0);
        if largest_id >= dictionary.size() {
            return Err(Error::ConfigError(format!(
                "Boundary marker id {} is outside dictionary {}",
                largest_id, dictionary
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# ArUco classroom tracker configuration

# Capture device identity
device:
  name: "Tablet-A"
  ip: "192.168.1.10"
  mac: "00:1A:2B:3C:4D:5E"
  location: "Classroom 1"

# Zone markers
markers:
  trainer_corner_ids: [34, 35]
  student_corner_ids: [36, 37]
  student_zone_padding: 50

# Lookup tables
lookups:
  words_csv: "id_words.csv"
  users_csv: "user_ids.csv"
  unknown_person_name: "ناشناس"

# Telemetry endpoint
telemetry:
  enabled: true
  url: "https://thingspod.com/api/v1/telemetry"
  timeout_secs: 10

# Chat notification on class end
notifier:
  enabled: true
  api_base: "https://eitaayar.ir/api"
  token: ""
  channel_id: "ArUcoGame"
  pin: true
  timeout_secs: 10

# Frame source: camera index or stream URL
capture:
  source: "http://192.168.1.102:8080/video"
  dictionary: "4x4_100"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses() {
        let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.markers.trainer_corner_ids, [34, 35]);
        assert_eq!(config.markers.student_zone_padding, 50);
        assert_eq!(config.capture.source, "http://192.168.1.102:8080/video");
        assert!(config.capture.replay.is_none());
        assert_eq!(config.capture.marker_dictionary().unwrap(), MarkerDictionary::Dict4x4_100);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("markers:\n  student_zone_padding: 10\n").unwrap();
        assert_eq!(config.markers.student_zone_padding, 10);
        assert_eq!(config.markers.student_corner_ids, [36, 37]);
        assert_eq!(config.device, DeviceConfig::default());
    }

    #[test]
    fn test_duplicate_boundary_ids_rejected() {
        let mut config = Config::default();
        config.markers.student_corner_ids = [35, 37];
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_negative_padding_rejected() {
        let mut config = Config::default();
        config.markers.student_zone_padding = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_telemetry_allows_empty_url() {
        let mut config = Config::default();
        config.telemetry.url.clear();
        assert!(config.validate().is_err());
        config.telemetry.enabled = false;
        config.validate().unwrap();
    }

    #[test]
    fn test_dictionary_from_yaml() {
        let config: Config = serde_yaml::from_str("capture:\n  dictionary: \"6x6_250\"\n").unwrap();
        assert_eq!(config.capture.marker_dictionary().unwrap(), MarkerDictionary::Dict6x6_250);
        assert_eq!(config.capture.source, "0");
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_dictionary_rejected() {
        let mut config = Config::default();
        config.capture.dictionary = "4x4_999".to_string();
        assert!(matches!(config.capture.marker_dictionary(), Err(Error::InvalidInput(_))));
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_boundary_ids_must_fit_dictionary() {
        let mut config = Config::default();
        config.capture.dictionary = "4x4_50".to_string();
        config.validate().unwrap();
        config.markers.student_corner_ids = [36, 50];
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }
}
