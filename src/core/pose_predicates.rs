// Pose predicates - geometric classifiers over one or two frames of keypoints
//
// Coordinates are normalized with y growing downward, so "above" means a
// smaller y value.

use crate::core::config::PoseThresholds;
use crate::core::geometry::{angle_between, distance, midpoint};
use crate::models::analysis::PoseKind;
use crate::models::pose::{BodyPart, KeypointSet};

/// Keypoints visible to a predicate for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub current: &'a KeypointSet,
    /// Most recent previously detected frame, if any
    pub previous: Option<&'a KeypointSet>,
}

pub type PredicateFn = fn(&FrameContext<'_>, &PoseThresholds) -> bool;

/// A named entry of the predicate catalog
pub struct PosePredicate {
    pub pose: PoseKind,
    pub evaluate: PredicateFn,
}

/// Every stateless predicate. Walking is produced by the gait detector.
pub static PREDICATES: [PosePredicate; 10] = [
    PosePredicate {
        pose: PoseKind::HandsUp,
        evaluate: |ctx, t| is_hands_up(ctx.current, t.hands_up_margin),
    },
    PosePredicate {
        pose: PoseKind::TPose,
        evaluate: |ctx, t| {
            is_t_pose(ctx.current, t.t_pose_height_band, t.t_pose_outward_margin)
        },
    },
    PosePredicate {
        pose: PoseKind::Squat,
        evaluate: |ctx, t| is_squat(ctx.current, t.squat_knee_angle, t.squat_hip_drop),
    },
    PosePredicate {
        pose: PoseKind::OneHandRaised,
        evaluate: |ctx, _| is_one_hand_raised(ctx.current),
    },
    PosePredicate {
        pose: PoseKind::StandingStill,
        evaluate: |ctx, t| is_standing_still(ctx.current, ctx.previous, t.standing_still_motion),
    },
    PosePredicate {
        pose: PoseKind::Jump,
        evaluate: |ctx, t| is_jump(ctx.current, ctx.previous, t.jump_rise),
    },
    PosePredicate {
        pose: PoseKind::Rotation,
        evaluate: |ctx, t| is_rotation(ctx.current, ctx.previous, t.rotation_shift),
    },
    PosePredicate {
        pose: PoseKind::LegRaise,
        evaluate: |ctx, t| is_leg_raise(ctx.current, t.leg_raise_margin),
    },
    PosePredicate {
        pose: PoseKind::Crouch,
        evaluate: |ctx, t| is_crouch(ctx.current, t.crouch_gap),
    },
    PosePredicate {
        pose: PoseKind::HeadTilt,
        evaluate: |ctx, t| is_head_tilt(ctx.current, t.head_tilt_offset),
    },
];

// ==============================================================================
// Single-frame predicates
// ==============================================================================

/// Both wrists above their own shoulders by more than `margin`
pub fn is_hands_up(kp: &KeypointSet, margin: f32) -> bool {
    let left = kp[BodyPart::LeftWrist].y < kp[BodyPart::LeftShoulder].y - margin;
    let right = kp[BodyPart::RightWrist].y < kp[BodyPart::RightShoulder].y - margin;
    left && right
}

/// Arms stretched out horizontally: wrists level with the shoulders and
/// reaching outward past them
pub fn is_t_pose(kp: &KeypointSet, height_band: f32, outward_margin: f32) -> bool {
    let (lw, rw) = (kp[BodyPart::LeftWrist], kp[BodyPart::RightWrist]);
    let (ls, rs) = (kp[BodyPart::LeftShoulder], kp[BodyPart::RightShoulder]);

    let level = (lw.y - ls.y).abs() < height_band && (rw.y - rs.y).abs() < height_band;
    let outward = lw.x < ls.x - outward_margin && rw.x > rs.x + outward_margin;
    level && outward
}

/// Knees bent past `knee_angle` on average and, on both sides, the
/// shoulder sitting more than `hip_drop` below the hip (`shoulder.y - hip.y`)
pub fn is_squat(kp: &KeypointSet, knee_angle: f32, hip_drop: f32) -> bool {
    let left_knee = angle_between(
        kp[BodyPart::LeftHip],
        kp[BodyPart::LeftKnee],
        kp[BodyPart::LeftAnkle],
    );
    let right_knee = angle_between(
        kp[BodyPart::RightHip],
        kp[BodyPart::RightKnee],
        kp[BodyPart::RightAnkle],
    );
    let avg_knee = (left_knee + right_knee) / 2.0;

    let left_drop = kp[BodyPart::LeftShoulder].y - kp[BodyPart::LeftHip].y;
    let right_drop = kp[BodyPart::RightShoulder].y - kp[BodyPart::RightHip].y;

    avg_knee < knee_angle && left_drop > hip_drop && right_drop > hip_drop
}

/// Either wrist above the nose
pub fn is_one_hand_raised(kp: &KeypointSet) -> bool {
    let head_y = kp[BodyPart::Nose].y;
    kp[BodyPart::LeftWrist].y < head_y || kp[BodyPart::RightWrist].y < head_y
}

/// Either ankle above its own hip by more than `margin`
pub fn is_leg_raise(kp: &KeypointSet, margin: f32) -> bool {
    kp[BodyPart::LeftAnkle].y < kp[BodyPart::LeftHip].y - margin
        || kp[BodyPart::RightAnkle].y < kp[BodyPart::RightHip].y - margin
}

/// Head pulled down: nose sits more than `gap` below the shoulder line
pub fn is_crouch(kp: &KeypointSet, gap: f32) -> bool {
    let shoulders = midpoint(kp[BodyPart::LeftShoulder], kp[BodyPart::RightShoulder]);
    kp[BodyPart::Nose].y - shoulders.y > gap
}

/// Nose shifted sideways from the shoulder midpoint by more than `offset`
pub fn is_head_tilt(kp: &KeypointSet, offset: f32) -> bool {
    let shoulders = midpoint(kp[BodyPart::LeftShoulder], kp[BodyPart::RightShoulder]);
    (kp[BodyPart::Nose].x - shoulders.x).abs() > offset
}

// ==============================================================================
// Two-frame predicates (false without a previous frame)
// ==============================================================================

/// Both ankles moved up by more than `rise` since the previous frame
pub fn is_jump(kp: &KeypointSet, prev: Option<&KeypointSet>, rise: f32) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    let left = prev[BodyPart::LeftAnkle].y - kp[BodyPart::LeftAnkle].y;
    let right = prev[BodyPart::RightAnkle].y - kp[BodyPart::RightAnkle].y;
    left > rise && right > rise
}

/// Average horizontal shoulder travel since the previous frame exceeds `shift`
pub fn is_rotation(kp: &KeypointSet, prev: Option<&KeypointSet>, shift: f32) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    let left = (prev[BodyPart::LeftShoulder].x - kp[BodyPart::LeftShoulder].x).abs();
    let right = (prev[BodyPart::RightShoulder].x - kp[BodyPart::RightShoulder].x).abs();
    (left + right) / 2.0 > shift
}

/// Summed displacement of all tracked parts since the previous frame is
/// below `max_motion`
pub fn is_standing_still(kp: &KeypointSet, prev: Option<&KeypointSet>, max_motion: f32) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    total_motion(kp, prev) < max_motion
}

/// Sum of per-part Euclidean displacement between two frames
pub fn total_motion(kp: &KeypointSet, prev: &KeypointSet) -> f32 {
    kp.iter()
        .map(|(part, point)| distance(point, prev[part]))
        .sum()
}
