// Frame classification - runs the predicate catalog and the gait detector
// over one detected frame

use crate::core::config::{AnalysisConfig, PoseThresholds};
use crate::core::gait_detector::GaitDetector;
use crate::core::pose_predicates::{FrameContext, PREDICATES};
use crate::models::analysis::{FrameClassification, PoseKind};
use crate::models::pose::KeypointSet;

/// Per-run frame classifier. Owns the gait detector, so it must be fed
/// every detected frame exactly once, in frame order.
pub struct FrameClassifier {
    thresholds: PoseThresholds,
    gait: GaitDetector,
}

impl FrameClassifier {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            thresholds: config.thresholds.clone(),
            gait: GaitDetector::new(&config.gait),
        }
    }

    /// Classify one detected frame. `previous` is the last detected frame
    /// before this one, if any. Advances the gait detector once.
    pub fn classify(
        &mut self,
        current: &KeypointSet,
        previous: Option<&KeypointSet>,
    ) -> FrameClassification {
        let ctx = FrameContext { current, previous };
        let mut classification = FrameClassification::default();

        for predicate in PREDICATES.iter() {
            classification.set(predicate.pose, (predicate.evaluate)(&ctx, &self.thresholds));
        }
        classification.set(PoseKind::Walking, self.gait.update(current));

        classification
    }

    pub fn gait(&self) -> &GaitDetector {
        &self.gait
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pose::fixtures::neutral_pose;
    use crate::models::pose::{BodyPart, Point2};

    #[test]
    fn test_first_frame_has_no_motion_poses() {
        let mut classifier = FrameClassifier::new(&AnalysisConfig::default());
        let result = classifier.classify(&neutral_pose(), None);
        assert_eq!(result.detected().count(), 0);
        assert_eq!(classifier.gait().frames_seen(), 1);
    }

    #[test]
    fn test_repeated_frame_is_standing_still() {
        let mut classifier = FrameClassifier::new(&AnalysisConfig::default());
        let kp = neutral_pose();
        classifier.classify(&kp, None);
        let result = classifier.classify(&kp, Some(&kp));

        assert!(result.is(PoseKind::StandingStill));
        assert!(!result.is(PoseKind::Jump));
        assert!(!result.is(PoseKind::Rotation));
        assert!(!result.is(PoseKind::Walking));
    }

    #[test]
    fn test_multiple_poses_in_one_frame() {
        let mut classifier = FrameClassifier::new(&AnalysisConfig::default());
        let kp = neutral_pose()
            .with(BodyPart::LeftWrist, Point2::new(0.38, 0.05))
            .with(BodyPart::RightWrist, Point2::new(0.62, 0.05))
            .with(BodyPart::Nose, Point2::new(0.60, 0.15));
        let result = classifier.classify(&kp, None);

        let detected: Vec<PoseKind> = result.detected().collect();
        assert_eq!(
            detected,
            vec![PoseKind::HandsUp, PoseKind::OneHandRaised, PoseKind::HeadTilt]
        );
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let mut config = AnalysisConfig::default();
        config.thresholds.head_tilt_offset = 0.2;
        let mut classifier = FrameClassifier::new(&config);

        let kp = neutral_pose().with(BodyPart::Nose, Point2::new(0.60, 0.15));
        assert!(!classifier.classify(&kp, None).is(PoseKind::HeadTilt));
    }
}
