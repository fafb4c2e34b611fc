//! Constants used throughout the application

/// Marker ids bounding the trainer zone
pub const DEFAULT_TRAINER_CORNER_IDS: [u32; 2] = [34, 35];

/// Marker ids bounding the student zone
pub const DEFAULT_STUDENT_CORNER_IDS: [u32; 2] = [36, 37];

/// Outward padding of the student zone, in pixels
pub const DEFAULT_STUDENT_ZONE_PADDING: i32 = 50;

/// Number of corners in a marker polygon
pub const MARKER_CORNERS: usize = 4;

/// Zone label carried by card-learned events
pub const STUDENT_ZONE_LABEL: &str = "student";

/// Display name used for person ids missing from the lookup
pub const UNKNOWN_PERSON_NAME: &str = "ناشناس";

/// Summary line used when a session ends without learned words
pub const NO_WORDS_LEARNED: &str = "هیچ کلمه‌ای یادگرفته نشده است.";

/// Default device identity reported in telemetry
pub const DEFAULT_DEVICE_NAME: &str = "Tablet-A";
pub const DEFAULT_DEVICE_IP: &str = "192.168.1.10";
pub const DEFAULT_DEVICE_MAC: &str = "00:1A:2B:3C:4D:5E";
pub const DEFAULT_DEVICE_LOCATION: &str = "Classroom 1";

/// Default outbound endpoints
pub const DEFAULT_TELEMETRY_URL: &str = "https://thingspod.com/api/v1/telemetry";
pub const DEFAULT_NOTIFIER_API_BASE: &str = "https://eitaayar.ir/api";
pub const DEFAULT_CHANNEL_ID: &str = "ArUcoGame";

/// Environment variable holding the chat bot token
pub const NOTIFIER_TOKEN_ENV: &str = "ARUCO_CLASSROOM_NOTIFIER_TOKEN";

/// Default HTTP timeout for both sinks, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
