// Data models for body landmarks, keypoint sets, and pose analysis errors

use serde::{Deserialize, Serialize};
use std::ops::Index;

// ==============================================================================
// Body Parts (13 tracked landmarks)
// ==============================================================================

/// Body parts the classifier needs. A frame is classifiable only when all
/// of them are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyPart {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    pub const COUNT: usize = 13;

    pub const ALL: [BodyPart; BodyPart::COUNT] = [
        BodyPart::Nose,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    /// Index of this part in the MediaPipe Pose landmark list (33 total)
    pub fn mediapipe_index(&self) -> usize {
        match self {
            BodyPart::Nose => 0,
            BodyPart::LeftShoulder => 11,
            BodyPart::RightShoulder => 12,
            BodyPart::LeftElbow => 13,
            BodyPart::RightElbow => 14,
            BodyPart::LeftWrist => 15,
            BodyPart::RightWrist => 16,
            BodyPart::LeftHip => 23,
            BodyPart::RightHip => 24,
            BodyPart::LeftKnee => 25,
            BodyPart::RightKnee => 26,
            BodyPart::LeftAnkle => 27,
            BodyPart::RightAnkle => 28,
        }
    }

    pub fn to_string(&self) -> &'static str {
        match self {
            BodyPart::Nose => "NOSE",
            BodyPart::LeftShoulder => "LEFT_SHOULDER",
            BodyPart::RightShoulder => "RIGHT_SHOULDER",
            BodyPart::LeftElbow => "LEFT_ELBOW",
            BodyPart::RightElbow => "RIGHT_ELBOW",
            BodyPart::LeftWrist => "LEFT_WRIST",
            BodyPart::RightWrist => "RIGHT_WRIST",
            BodyPart::LeftHip => "LEFT_HIP",
            BodyPart::RightHip => "RIGHT_HIP",
            BodyPart::LeftKnee => "LEFT_KNEE",
            BodyPart::RightKnee => "RIGHT_KNEE",
            BodyPart::LeftAnkle => "LEFT_ANKLE",
            BodyPart::RightAnkle => "RIGHT_ANKLE",
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

/// Body side, used for step events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn to_string(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn ankle(&self) -> BodyPart {
        match self {
            Side::Left => BodyPart::LeftAnkle,
            Side::Right => BodyPart::RightAnkle,
        }
    }

    pub fn hip(&self) -> BodyPart {
        match self {
            Side::Left => BodyPart::LeftHip,
            Side::Right => BodyPart::RightHip,
        }
    }
}

// ==============================================================================
// Points and Landmarks
// ==============================================================================

/// A normalized 2D image point. Origin top-left, y grows downward.
/// Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for [f32; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

/// A single landmark as emitted by the upstream pose estimator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawLandmark {
    pub x: f32, // Normalized [0, 1] for image coordinates
    pub y: f32, // Normalized [0, 1] for image coordinates
    #[serde(default)]
    pub z: f32, // Depth, ignored by the 2D classifier
    #[serde(default = "full_confidence", alias = "visibility")]
    pub confidence: f32, // Detection confidence [0, 1]
}

fn full_confidence() -> f32 {
    1.0
}

impl RawLandmark {
    pub fn new(x: f32, y: f32, z: f32, confidence: f32) -> Self {
        Self {
            x,
            y,
            z,
            confidence,
        }
    }

    pub fn is_visible(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

// ==============================================================================
// Keypoint Set
// ==============================================================================

/// All 13 body parts for one frame. Can only be built complete; partial
/// detections never become a `KeypointSet`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeypointSet {
    points: [Point2; BodyPart::COUNT],
}

impl KeypointSet {
    /// Build from (part, point) pairs. Returns `None` if any part is missing.
    /// Later duplicates overwrite earlier ones.
    pub fn from_parts<I>(parts: I) -> Option<Self>
    where
        I: IntoIterator<Item = (BodyPart, Point2)>,
    {
        let mut slots: [Option<Point2>; BodyPart::COUNT] = [None; BodyPart::COUNT];
        for (part, point) in parts {
            slots[part.slot()] = Some(point);
        }

        let mut points = [Point2::default(); BodyPart::COUNT];
        for (slot, value) in points.iter_mut().zip(slots) {
            *slot = value?;
        }
        Some(Self { points })
    }

    /// Pick the 13 parts out of a MediaPipe Pose landmark list.
    /// Landmarks below `min_confidence` count as missing.
    pub fn from_mediapipe(landmarks: &[RawLandmark], min_confidence: f32) -> Option<Self> {
        Self::from_parts(BodyPart::ALL.iter().filter_map(|part| {
            landmarks
                .get(part.mediapipe_index())
                .filter(|lm| lm.is_visible(min_confidence))
                .map(|lm| (*part, Point2::new(lm.x, lm.y)))
        }))
    }

    pub fn get(&self, part: BodyPart) -> Point2 {
        self.points[part.slot()]
    }

    /// Replace one part, returning the updated set
    pub fn with(mut self, part: BodyPart, point: Point2) -> Self {
        self.points[part.slot()] = point;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, Point2)> + '_ {
        BodyPart::ALL.iter().map(move |part| (*part, self.get(*part)))
    }
}

impl Index<BodyPart> for KeypointSet {
    type Output = Point2;

    fn index(&self, part: BodyPart) -> &Point2 {
        &self.points[part.slot()]
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Cannot open video: {video} ({reason})")]
    SourceUnavailable { video: String, reason: String },

    #[error("Failed to read frame {frame} of {video}: {reason}")]
    ReadFailed {
        video: String,
        frame: u64,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Analysis of {0} was cancelled")]
    Cancelled(String),

    #[error("Analysis of {video} exceeded deadline of {seconds:.1}s")]
    DeadlineExceeded { video: String, seconds: f64 },

    #[error("Analysis task failed: {0}")]
    TaskFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PoseResult<T> = Result<T, PoseError>;
