// Landmark dump files - JSON Lines written by the upstream pose estimator
//
// One record per decoded frame, in frame order:
//   null                                         no detection
//   {"landmarks": null}                          no detection
//   {"landmarks": {"NOSE": [0.5, 0.1], ...}}     named parts
//   {"landmarks": [{"x": .., "y": .., "z": .., "confidence": ..}, ...]}
//                                                MediaPipe Pose list (33)
// Records missing any of the 13 tracked parts count as no detection.

use crate::core::config::SourceConfig;
use crate::models::pose::{BodyPart, KeypointSet, Point2, PoseError, PoseResult, RawLandmark};
use crate::platform::pose::landmark_bridge::{FrameLandmarks, FrameStream, LandmarkBridge};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    landmarks: Option<LandmarkPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LandmarkPayload {
    Named(BTreeMap<String, NamedPoint>),
    Indexed(Vec<RawLandmark>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NamedPoint {
    Pair([f32; 2]),
    Landmark(RawLandmark),
}

impl LandmarkPayload {
    fn into_keypoints(self, min_confidence: f32) -> FrameLandmarks {
        match self {
            LandmarkPayload::Named(parts) => {
                KeypointSet::from_parts(BodyPart::ALL.iter().filter_map(|part| {
                    let point = match parts.get(part.to_string())? {
                        NamedPoint::Pair(pair) => Point2::from(*pair),
                        NamedPoint::Landmark(lm) if lm.is_visible(min_confidence) => {
                            Point2::new(lm.x, lm.y)
                        }
                        NamedPoint::Landmark(_) => return None,
                    };
                    Some((*part, point))
                }))
            }
            LandmarkPayload::Indexed(landmarks) => {
                KeypointSet::from_mediapipe(&landmarks, min_confidence)
            }
        }
    }
}

/// Parse one dump line. Blank lines yield `Ok(None)`.
fn parse_line(
    line: &str,
    min_confidence: f32,
) -> Result<Option<FrameLandmarks>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let record: Option<FrameRecord> = serde_json::from_str(line)?;
    Ok(Some(
        record
            .and_then(|r| r.landmarks)
            .and_then(|l| l.into_keypoints(min_confidence)),
    ))
}

/// Frame stream over an open dump file
pub struct LandmarkFileStream {
    video: String,
    lines: Lines<BufReader<File>>,
    frames_read: u64,
    min_confidence: f32,
}

impl FrameStream for LandmarkFileStream {
    fn next_frame(&mut self) -> PoseResult<Option<FrameLandmarks>> {
        for line in self.lines.by_ref() {
            let frame = self.frames_read + 1;
            let line = line.map_err(|e| PoseError::ReadFailed {
                video: self.video.clone(),
                frame,
                reason: e.to_string(),
            })?;

            let parsed = parse_line(&line, self.min_confidence).map_err(|e| PoseError::ReadFailed {
                video: self.video.clone(),
                frame,
                reason: e.to_string(),
            })?;

            if let Some(landmarks) = parsed {
                self.frames_read = frame;
                return Ok(Some(landmarks));
            }
        }
        Ok(None)
    }
}

/// Bridge that treats the video identifier as a path to a landmark dump
pub struct LandmarkFileBridge {
    min_confidence: f32,
}

impl LandmarkFileBridge {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            min_confidence: config.min_landmark_confidence,
        }
    }
}

impl LandmarkBridge for LandmarkFileBridge {
    fn open(&self, video: &str) -> PoseResult<Box<dyn FrameStream>> {
        let path = Path::new(video);
        if path.is_dir() {
            return Err(PoseError::SourceUnavailable {
                video: video.to_string(),
                reason: "is a directory".to_string(),
            });
        }

        let file = File::open(path).map_err(|e| PoseError::SourceUnavailable {
            video: video.to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!(video, "opened landmark dump");

        Ok(Box::new(LandmarkFileStream {
            video: video.to_string(),
            lines: BufReader::new(file).lines(),
            frames_read: 0,
            min_confidence: self.min_confidence,
        }))
    }

    fn get_bridge_info(&self) -> String {
        format!(
            "Landmark dump files (JSON Lines, min confidence {})",
            self.min_confidence
        )
    }
}
