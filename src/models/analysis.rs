// Data models for per-frame classifications and video-level summaries

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==============================================================================
// Pose Catalog
// ==============================================================================

/// The fixed catalog of poses and motion events reported per video
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseKind {
    HandsUp,
    TPose,
    Squat,
    OneHandRaised,
    StandingStill,
    Jump,
    Rotation,
    LegRaise,
    Walking,
    Crouch,
    HeadTilt,
}

impl PoseKind {
    pub const COUNT: usize = 11;

    pub const ALL: [PoseKind; PoseKind::COUNT] = [
        PoseKind::HandsUp,
        PoseKind::TPose,
        PoseKind::Squat,
        PoseKind::OneHandRaised,
        PoseKind::StandingStill,
        PoseKind::Jump,
        PoseKind::Rotation,
        PoseKind::LegRaise,
        PoseKind::Walking,
        PoseKind::Crouch,
        PoseKind::HeadTilt,
    ];

    pub fn to_string(&self) -> &'static str {
        match self {
            PoseKind::HandsUp => "hands_up",
            PoseKind::TPose => "t_pose",
            PoseKind::Squat => "squat",
            PoseKind::OneHandRaised => "one_hand_raised",
            PoseKind::StandingStill => "standing_still",
            PoseKind::Jump => "jump",
            PoseKind::Rotation => "rotation",
            PoseKind::LegRaise => "leg_raise",
            PoseKind::Walking => "walking",
            PoseKind::Crouch => "crouch",
            PoseKind::HeadTilt => "head_tilt",
        }
    }

    pub fn from_string(name: &str) -> Option<Self> {
        PoseKind::ALL.iter().copied().find(|p| p.to_string() == name)
    }

    /// Poses that compare the current frame against the previous detected one
    pub fn needs_previous_frame(&self) -> bool {
        matches!(
            self,
            PoseKind::StandingStill | PoseKind::Jump | PoseKind::Rotation
        )
    }
}

// ==============================================================================
// Frame Classification
// ==============================================================================

/// Per-frame classification vector: one flag per catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameClassification {
    flags: [bool; PoseKind::COUNT],
}

impl FrameClassification {
    pub fn set(&mut self, pose: PoseKind, value: bool) {
        self.flags[pose as usize] = value;
    }

    pub fn is(&self, pose: PoseKind) -> bool {
        self.flags[pose as usize]
    }

    /// Poses that are true in this frame, in catalog order
    pub fn detected(&self) -> impl Iterator<Item = PoseKind> + '_ {
        PoseKind::ALL.iter().copied().filter(move |p| self.is(*p))
    }
}

// ==============================================================================
// Summary Record
// ==============================================================================

/// Frame counts per pose. Always carries every catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseCounts(BTreeMap<PoseKind, u64>);

impl Default for PoseCounts {
    fn default() -> Self {
        Self(PoseKind::ALL.iter().map(|p| (*p, 0)).collect())
    }
}

impl PoseCounts {
    pub fn record(&mut self, classification: &FrameClassification) {
        for pose in classification.detected() {
            *self.0.entry(pose).or_insert(0) += 1;
        }
    }

    pub fn get(&self, pose: PoseKind) -> u64 {
        self.0.get(&pose).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoseKind, u64)> + '_ {
        self.0.iter().map(|(p, c)| (*p, *c))
    }

    /// Pose with the highest non-zero count; ties go to catalog order
    pub fn dominant(&self) -> Option<PoseKind> {
        self.iter()
            .filter(|(_, count)| *count > 0)
            .fold(None, |best: Option<(PoseKind, u64)>, (pose, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((pose, count)),
            })
            .map(|(pose, _)| pose)
    }
}

/// Video-level analysis result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub video: String,
    pub total_frames: u64,
    pub poses_detected: PoseCounts,
}

/// Error payload returned instead of a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

/// What the serving layer receives for one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Summary(SummaryRecord),
    Error(ErrorResult),
}

impl AnalysisOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisOutcome::Error(_))
    }

    pub fn summary(&self) -> Option<&SummaryRecord> {
        match self {
            AnalysisOutcome::Summary(summary) => Some(summary),
            AnalysisOutcome::Error(_) => None,
        }
    }
}

impl<E: std::fmt::Display> From<Result<SummaryRecord, E>> for AnalysisOutcome {
    fn from(result: Result<SummaryRecord, E>) -> Self {
        match result {
            Ok(summary) => AnalysisOutcome::Summary(summary),
            Err(e) => AnalysisOutcome::Error(ErrorResult {
                error: e.to_string(),
            }),
        }
    }
}
