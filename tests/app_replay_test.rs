//! End-to-end tests: replayed detections through the app and emitter


use aruco_classroom::{
    app::ClassroomApp,
    capture::{FrameSource, ReplaySource, VecSource},
    config::{Config, DeviceConfig, NotifierConfig},
    emitter::{Delivery, EventEmitter},
    frame::MarkerDetection,
};
use std::io::Write;
use test_helpers::*;

fn emitter(telemetry: &RecordingTelemetry, notifier: &RecordingNotifier) -> EventEmitter {
    EventEmitter::new(DeviceConfig::default(), &NotifierConfig::default())
        .with_telemetry(Box::new(telemetry.clone()))
        .with_notifier(Box::new(notifier.clone()))
}

fn app(frames: Vec<Vec<MarkerDetection>>, emitter: EventEmitter) -> ClassroomApp {
    ClassroomApp::new(&Config::default(), Box::new(VecSource::new(frames)), test_lookups(), emitter)
        .with_clock(Box::new(|| at(14, 30, 0)))
}

fn lesson() -> Vec<Vec<MarkerDetection>> {
    vec![
        frame_with(&people()),
        frame_with(&[people(), vec![card_in_student_zone(APPLE)]].concat()),
        frame_with(&[people(), vec![card_in_student_zone(APPLE)]].concat()),
        frame_with(&[people(), vec![card_in_student_zone(BOOK)]].concat()),
        vec![square(TRAINER, 50.0, 50.0)],
    ]
}

#[test]
fn test_full_lesson_payloads() {
    let telemetry = RecordingTelemetry::default();
    let notifier = RecordingNotifier::default();
    let mut app = app(lesson(), emitter(&telemetry, &notifier));

    let summary = app.run().unwrap();
    assert_eq!(summary.frames, 5);
    assert_eq!(summary.sessions_started, 1);
    assert_eq!(summary.cards_learned, 2);
    assert_eq!(summary.sessions_ended, 1);
    assert_eq!(summary.delivery_failures, 0);

    let sent = telemetry.sent();
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[0]["class_started"], true);
    assert_eq!(sent[0]["IP"], "192.168.1.10");
    assert_eq!(sent[0]["time"], "1403-01-01T14:30:00");
    assert_eq!(sent[1]["lesson_card_word"], "apple");
    assert_eq!(sent[1]["lesson_card_count"], 1);
    assert_eq!(sent[2]["lesson_card_word"], "book");
    assert_eq!(sent[2]["lesson_card_count"], 2);
    assert_eq!(sent[3]["class_started"], false);
    assert_eq!(sent[3]["lesson_card_count"], 2);

    let messages = notifier.sent();
    assert_eq!(messages.len(), 1);
    let (channel, text, pin) = &messages[0];
    assert_eq!(channel, "ArUcoGame");
    assert!(*pin);
    assert!(text.contains("1403-01-01 14:30:00"));
    assert!(text.contains("Ahmadi"));
    assert!(text.contains("Karimi"));
    assert!(text.contains("- apple\n- book"));
}

#[test]
fn test_delivery_failure_does_not_roll_back_state() {
    let telemetry = RecordingTelemetry::failing();
    let notifier = RecordingNotifier {
        fail: true,
        ..RecordingNotifier::default()
    };
    let mut app = app(Vec::new(), emitter(&telemetry, &notifier));

    let results = app.process_frame(&frame_with(&people()), at(9, 0, 0));
    assert_eq!(results.len(), 1);
    assert!(results[0].1.telemetry.is_failed());
    assert_eq!(results[0].1.notification, Delivery::Skipped);
    assert!(app.tracker().state().is_active());

    let results = app.process_frame(&frame_with(&[people(), vec![card_in_student_zone(CAT)]].concat()), at(9, 0, 1));
    assert_eq!(results.len(), 1);
    assert_eq!(app.tracker().state().learned_card_count(), 1);

    // Not retried on the next frame
    let results = app.process_frame(&frame_with(&[people(), vec![card_in_student_zone(CAT)]].concat()), at(9, 0, 2));
    assert!(results.is_empty());

    let results = app.process_frame(&[], at(9, 1, 0));
    assert!(results[0].1.telemetry.is_failed());
    assert!(results[0].1.notification.is_failed());
    assert!(!app.tracker().state().is_active());
    assert_eq!(telemetry.sent().len(), 3);
    assert_eq!(notifier.sent().len(), 1);
}

#[test]
fn test_emitter_without_sinks_skips() {
    let mut app = app(Vec::new(), EventEmitter::new(DeviceConfig::default(), &NotifierConfig::default()));
    let results = app.process_frame(&frame_with(&people()), at(9, 0, 0));
    assert_eq!(results[0].1.telemetry, Delivery::Skipped);
    assert_eq!(results[0].1.notification, Delivery::Skipped);
}

#[test]
fn test_replay_file_drives_session() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for frame in lesson() {
        writeln!(file, "{}", serde_json::to_string(&frame).unwrap()).unwrap();
    }
    file.flush().unwrap();

    let telemetry = RecordingTelemetry::default();
    let notifier = RecordingNotifier::default();
    let source = ReplaySource::open(file.path()).unwrap();
    let mut app = ClassroomApp::new(&Config::default(), Box::new(source), test_lookups(), emitter(&telemetry, &notifier))
        .with_clock(Box::new(|| at(8, 0, 0)));

    let summary = app.run().unwrap();
    assert_eq!(summary.frames, 5);
    assert_eq!(summary.sessions_ended, 1);
    assert_eq!(telemetry.sent().len(), 4);
}

#[test]
fn test_bad_replay_line_stops_the_loop() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{}", serde_json::to_string(&frame_with(&people())).unwrap()).unwrap();
    writeln!(file, "not json").unwrap();
    writeln!(file, "[]").unwrap();
    file.flush().unwrap();

    let telemetry = RecordingTelemetry::default();
    let source = ReplaySource::open(file.path()).unwrap();
    let mut app = ClassroomApp::new(
        &Config::default(),
        Box::new(source),
        test_lookups(),
        EventEmitter::new(DeviceConfig::default(), &NotifierConfig::default()).with_telemetry(Box::new(telemetry.clone())),
    );

    let summary = app.run().unwrap();
    assert_eq!(summary.frames, 1);
    assert_eq!(summary.sessions_started, 1);
    assert!(app.tracker().state().is_active());
}

#[test]
fn test_vec_source_runs_dry() {
    let mut source = VecSource::new(vec![Vec::new()]);
    assert!(source.next_frame().unwrap().is_some());
    assert!(source.next_frame().unwrap().is_none());
}
