//! Integration tests for the analysis pipeline
//!
//! Landmark dump file -> file bridge -> classifier -> summary JSON

use dance_analysis_lib::{
    analyze_video, AnalysisConfig, AnalysisOutcome, AnalysisService, BodyPart, KeypointSet,
    LandmarkFileBridge, Point2, PoseKind,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn standing() -> KeypointSet {
    KeypointSet::from_parts([
        (BodyPart::Nose, Point2::new(0.50, 0.15)),
        (BodyPart::LeftShoulder, Point2::new(0.40, 0.30)),
        (BodyPart::RightShoulder, Point2::new(0.60, 0.30)),
        (BodyPart::LeftElbow, Point2::new(0.38, 0.42)),
        (BodyPart::RightElbow, Point2::new(0.62, 0.42)),
        (BodyPart::LeftWrist, Point2::new(0.37, 0.52)),
        (BodyPart::RightWrist, Point2::new(0.63, 0.52)),
        (BodyPart::LeftHip, Point2::new(0.44, 0.55)),
        (BodyPart::RightHip, Point2::new(0.56, 0.55)),
        (BodyPart::LeftKnee, Point2::new(0.44, 0.72)),
        (BodyPart::RightKnee, Point2::new(0.56, 0.72)),
        (BodyPart::LeftAnkle, Point2::new(0.44, 0.90)),
        (BodyPart::RightAnkle, Point2::new(0.56, 0.90)),
    ])
    .unwrap()
}

fn hands_up() -> KeypointSet {
    standing()
        .with(BodyPart::LeftWrist, Point2::new(0.38, 0.10))
        .with(BodyPart::RightWrist, Point2::new(0.62, 0.10))
}

/// One named-format dump line
fn named_record(kp: &KeypointSet) -> String {
    let parts: serde_json::Map<String, serde_json::Value> = kp
        .iter()
        .map(|(part, p)| (part.to_string().to_string(), serde_json::json!([p.x, p.y])))
        .collect();
    serde_json::json!({ "landmarks": parts }).to_string()
}

/// One MediaPipe-format dump line (33 landmarks with visibility)
fn mediapipe_record(kp: &KeypointSet) -> String {
    let hidden = serde_json::json!({"x": 0.5, "y": 0.5, "z": 0.0, "visibility": 0.2});
    let mut landmarks = vec![hidden; 33];
    for (part, p) in kp.iter() {
        landmarks[part.mediapipe_index()] =
            serde_json::json!({"x": p.x, "y": p.y, "z": 0.0, "visibility": 0.99});
    }
    serde_json::json!({ "landmarks": landmarks }).to_string()
}

fn write_dump(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_named_dump_summary() {
    let dump = write_dump(&[
        named_record(&hands_up()),
        named_record(&hands_up()),
        "null".to_string(),
        named_record(&standing()),
        named_record(&standing()),
    ]);
    let video = dump.path().to_str().unwrap();

    let config = AnalysisConfig::default();
    let bridge = LandmarkFileBridge::new(&config.source);
    let outcome = analyze_video(&bridge, video, &config);

    let summary = outcome.summary().expect("summary");
    assert_eq!(summary.video, video);
    assert_eq!(summary.total_frames, 5);
    assert_eq!(summary.poses_detected.get(PoseKind::HandsUp), 2);
    assert_eq!(summary.poses_detected.get(PoseKind::StandingStill), 2);
    assert_eq!(summary.poses_detected.get(PoseKind::Walking), 0);
}

#[test]
fn test_mediapipe_dump_matches_named_dump() {
    let frames = [standing(), hands_up(), hands_up(), standing()];
    let named = write_dump(&frames.iter().map(named_record).collect::<Vec<_>>());
    let mediapipe = write_dump(&frames.iter().map(mediapipe_record).collect::<Vec<_>>());

    let mut config = AnalysisConfig::default();
    config.source.min_landmark_confidence = 0.5;
    let bridge = LandmarkFileBridge::new(&config.source);

    let a = analyze_video(&bridge, named.path().to_str().unwrap(), &config);
    let b = analyze_video(&bridge, mediapipe.path().to_str().unwrap(), &config);
    assert_eq!(
        a.summary().unwrap().poses_detected,
        b.summary().unwrap().poses_detected
    );
}

#[test]
fn test_summary_json_shape() {
    let dump = write_dump(&[named_record(&standing())]);
    let config = AnalysisConfig::default();
    let bridge = LandmarkFileBridge::new(&config.source);
    let outcome = analyze_video(&bridge, dump.path().to_str().unwrap(), &config);

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["total_frames"], 1);
    let poses = json["poses_detected"].as_object().unwrap();
    assert_eq!(poses.len(), 11);
    for name in [
        "hands_up",
        "t_pose",
        "squat",
        "one_hand_raised",
        "standing_still",
        "jump",
        "rotation",
        "leg_raise",
        "walking",
        "crouch",
        "head_tilt",
    ] {
        assert_eq!(poses[name], 0, "{}", name);
    }
}

#[test]
fn test_missing_video_is_error_json() {
    let config = AnalysisConfig::default();
    let bridge = LandmarkFileBridge::new(&config.source);
    let outcome = analyze_video(&bridge, "Dataset/non_existent.mp4", &config);

    assert!(outcome.is_error());
    let json = serde_json::to_value(&outcome).unwrap();
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("Dataset/non_existent.mp4"));
    assert!(json.get("total_frames").is_none());
}

#[test]
fn test_empty_dump_is_empty_summary() {
    let dump = write_dump(&[]);
    let config = AnalysisConfig::default();
    let bridge = LandmarkFileBridge::new(&config.source);
    let outcome = analyze_video(&bridge, dump.path().to_str().unwrap(), &config);

    let summary = outcome.summary().unwrap();
    assert_eq!(summary.total_frames, 0);
    assert!(summary.poses_detected.iter().all(|(_, count)| count == 0));
}

#[tokio::test]
async fn test_service_over_dump_files() {
    let first = write_dump(&[named_record(&hands_up()), named_record(&hands_up())]);
    let second = write_dump(&vec!["null".to_string(); 3]);

    let config = AnalysisConfig::default();
    let bridge = Arc::new(LandmarkFileBridge::new(&config.source));
    let service = AnalysisService::new(bridge, config);

    let videos = vec![
        first.path().to_str().unwrap().to_string(),
        "missing.jsonl".to_string(),
        second.path().to_str().unwrap().to_string(),
    ];
    let outcomes = service.analyze_many(&videos, None).await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].summary().unwrap().poses_detected.get(PoseKind::HandsUp), 2);
    assert!(matches!(outcomes[1], AnalysisOutcome::Error(_)));
    assert_eq!(outcomes[2].summary().unwrap().total_frames, 3);
}
