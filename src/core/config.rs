use crate::models::pose::{PoseError, PoseResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Analysis configuration. Every field has a default, so partial files load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Pose predicate thresholds
    pub thresholds: PoseThresholds,
    /// Walking gait detector parameters
    pub gait: GaitConfig,
    /// Upstream landmark handling
    pub source: SourceConfig,
}

/// Tunable thresholds for the pose predicates, in normalized image units
/// unless noted otherwise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoseThresholds {
    /// How far above its shoulder each wrist must be for hands_up
    pub hands_up_margin: f32,
    /// Max vertical wrist-to-shoulder distance for t_pose
    pub t_pose_height_band: f32,
    /// How far outside the shoulders each wrist must reach for t_pose
    pub t_pose_outward_margin: f32,
    /// Average knee angle (degrees) below which knees count as bent
    pub squat_knee_angle: f32,
    /// Minimum `shoulder.y - hip.y` on both sides for squat
    pub squat_hip_drop: f32,
    /// Minimum upward travel of both ankles between frames for jump
    pub jump_rise: f32,
    /// Minimum average horizontal shoulder travel between frames for rotation
    pub rotation_shift: f32,
    /// How far above its hip an ankle must be for leg_raise
    pub leg_raise_margin: f32,
    /// Minimum nose-below-shoulder-line gap for crouch
    pub crouch_gap: f32,
    /// Minimum horizontal nose offset from the shoulder midpoint for head_tilt
    pub head_tilt_offset: f32,
    /// Total keypoint displacement between frames below which the body is still
    pub standing_still_motion: f32,
}

impl Default for PoseThresholds {
    fn default() -> Self {
        Self {
            hands_up_margin: 0.08,
            t_pose_height_band: 0.06,
            t_pose_outward_margin: 0.05,
            squat_knee_angle: 120.0,
            squat_hip_drop: 0.05,
            jump_rise: 0.05,
            rotation_shift: 0.05,
            leg_raise_margin: 0.1,
            crouch_gap: 0.05,
            head_tilt_offset: 0.05,
            standing_still_motion: 0.02,
        }
    }
}

/// Walking gait detector parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GaitConfig {
    /// Capacity of the ankle position and step event histories
    pub history_capacity: usize,
    /// Relative ankle x change between frames that counts as a step
    pub step_threshold: f32,
    /// Number of most recent step events that must alternate sides
    pub min_alt_steps: usize,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            history_capacity: 30,
            step_threshold: 0.02,
            min_alt_steps: 3,
        }
    }
}

/// Upstream landmark handling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Indexed landmarks below this confidence are treated as undetected (0.0-1.0)
    pub min_landmark_confidence: f32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            min_landmark_confidence: 0.0,
        }
    }
}

const SECTIONS: [&str; 3] = ["thresholds", "gait", "source"];

impl AnalysisConfig {
    /// Load configuration from a JSON file and validate it
    pub fn load(path: &Path) -> PoseResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from the default location if a file
    /// exists there, else fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> PoseResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(default_path) if default_path.exists() => Self::load(&default_path),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> PoseResult<()> {
        self.validate()?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> PoseResult<()> {
        let t = &self.thresholds;
        let non_negative = [
            ("hands_up_margin", t.hands_up_margin),
            ("t_pose_height_band", t.t_pose_height_band),
            ("t_pose_outward_margin", t.t_pose_outward_margin),
            ("squat_hip_drop", t.squat_hip_drop),
            ("jump_rise", t.jump_rise),
            ("rotation_shift", t.rotation_shift),
            ("leg_raise_margin", t.leg_raise_margin),
            ("crouch_gap", t.crouch_gap),
            ("head_tilt_offset", t.head_tilt_offset),
            ("standing_still_motion", t.standing_still_motion),
            ("step_threshold", self.gait.step_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(PoseError::InvalidConfig(format!(
                    "{}: {}. Must be a finite, non-negative number",
                    name, value
                )));
            }
        }

        if !(t.squat_knee_angle > 0.0 && t.squat_knee_angle <= 180.0) {
            return Err(PoseError::InvalidConfig(format!(
                "squat_knee_angle: {}. Must be in (0, 180] degrees",
                t.squat_knee_angle
            )));
        }

        if self.gait.history_capacity < 2 {
            return Err(PoseError::InvalidConfig(format!(
                "history_capacity: {}. Must be at least 2",
                self.gait.history_capacity
            )));
        }

        if self.gait.min_alt_steps == 0 || self.gait.min_alt_steps > self.gait.history_capacity {
            return Err(PoseError::InvalidConfig(format!(
                "min_alt_steps: {}. Must be between 1 and history_capacity ({})",
                self.gait.min_alt_steps, self.gait.history_capacity
            )));
        }

        if !(0.0..=1.0).contains(&self.source.min_landmark_confidence) {
            return Err(PoseError::InvalidConfig(format!(
                "min_landmark_confidence: {}. Must be between 0.0 and 1.0",
                self.source.min_landmark_confidence
            )));
        }

        Ok(())
    }

    /// Override a single field by name, e.g. `jump_rise` or `gait.min_alt_steps`.
    /// The raw value is parsed as JSON, so numbers are written as-is.
    pub fn apply_override(&mut self, name: &str, raw: &str) -> PoseResult<()> {
        let value: Value = serde_json::from_str(raw.trim()).map_err(|_| {
            PoseError::InvalidConfig(format!("{}: cannot parse value {:?}", name, raw))
        })?;

        let (section_hint, key) = match name.split_once('.') {
            Some((section, key)) => (Some(section), key),
            None => (None, name),
        };

        let mut tree = serde_json::to_value(&*self)?;
        let mut applied = false;
        for section in SECTIONS {
            if section_hint.is_some_and(|hint| hint != section) {
                continue;
            }
            if let Some(fields) = tree.get_mut(section).and_then(Value::as_object_mut) {
                if let Some(slot) = fields.get_mut(key) {
                    *slot = value;
                    applied = true;
                    break;
                }
            }
        }

        if !applied {
            return Err(PoseError::InvalidConfig(format!("unknown setting: {}", name)));
        }

        let updated: AnalysisConfig = serde_json::from_value(tree).map_err(|e| {
            PoseError::InvalidConfig(format!("{}: {}", name, e))
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()?;

        let mut path = PathBuf::from(home);
        path.push(".dance_analysis");
        path.push("config");
        path.push("settings.json");

        Some(path)
    }
}
