// Walking detection - confirms gait from alternating left/right step events

use crate::core::config::GaitConfig;
use crate::core::history::BoundedHistory;
use crate::models::pose::{KeypointSet, Side};

/// A sudden horizontal ankle displacement relative to the hip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    pub side: Side,
    /// Detector frame counter when the step was seen (1-based)
    pub frame: u64,
}

/// Gait detector for one analysis run.
///
/// Ankle x is tracked relative to the same-side hip so whole-body
/// translation does not register as steps. Walking is confirmed only when
/// the most recent `min_alt_steps` step events strictly alternate sides,
/// which rejects same-side jitter and single large sways.
pub struct GaitDetector {
    left_rel: BoundedHistory<f32>,
    right_rel: BoundedHistory<f32>,
    events: BoundedHistory<StepEvent>,
    frame_idx: u64,
    step_threshold: f32,
    min_alt_steps: usize,
}

impl GaitDetector {
    pub fn new(config: &GaitConfig) -> Self {
        Self {
            left_rel: BoundedHistory::new(config.history_capacity),
            right_rel: BoundedHistory::new(config.history_capacity),
            events: BoundedHistory::new(config.history_capacity),
            frame_idx: 0,
            step_threshold: config.step_threshold,
            min_alt_steps: config.min_alt_steps,
        }
    }

    /// Feed one detected frame. Returns true if walking is confirmed for it.
    pub fn update(&mut self, kp: &KeypointSet) -> bool {
        self.frame_idx += 1;

        self.left_rel.push(relative_ankle_x(kp, Side::Left));
        self.right_rel.push(relative_ankle_x(kp, Side::Right));

        if self.left_rel.len() < 2 || self.right_rel.len() < 2 {
            return false;
        }

        for side in [Side::Left, Side::Right] {
            let history = match side {
                Side::Left => &self.left_rel,
                Side::Right => &self.right_rel,
            };
            if let (Some(latest), Some(previous)) = (history.back(0), history.back(1)) {
                if (latest - previous).abs() > self.step_threshold {
                    self.events.push(StepEvent {
                        side,
                        frame: self.frame_idx,
                    });
                }
            }
        }

        self.is_walking()
    }

    /// True when the newest `min_alt_steps` step events alternate sides
    pub fn is_walking(&self) -> bool {
        if self.min_alt_steps == 0 || self.events.len() < self.min_alt_steps {
            return false;
        }

        let recent: Vec<Side> = self
            .events
            .recent(self.min_alt_steps)
            .map(|event| event.side)
            .collect();
        recent.windows(2).all(|pair| pair[0] != pair[1])
    }

    /// Step events currently in the window, oldest first
    pub fn events(&self) -> impl Iterator<Item = &StepEvent> + '_ {
        self.events.iter()
    }

    /// Number of frames fed so far
    pub fn frames_seen(&self) -> u64 {
        self.frame_idx
    }

    /// Reset the detector to its initial state
    pub fn reset(&mut self) {
        self.left_rel.clear();
        self.right_rel.clear();
        self.events.clear();
        self.frame_idx = 0;
    }
}

fn relative_ankle_x(kp: &KeypointSet, side: Side) -> f32 {
    kp[side.ankle()].x - kp[side.hip()].x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pose::fixtures::neutral_pose;
    use crate::models::pose::{BodyPart, Point2};

    /// Neutral pose with ankles offset horizontally from their hips
    fn with_ankle_offsets(left: f32, right: f32) -> KeypointSet {
        let kp = neutral_pose();
        let (lh, rh) = (kp[BodyPart::LeftHip], kp[BodyPart::RightHip]);
        kp.with(BodyPart::LeftAnkle, Point2::new(lh.x + left, 0.90))
            .with(BodyPart::RightAnkle, Point2::new(rh.x + right, 0.90))
    }

    fn feed(detector: &mut GaitDetector, offsets: &[(f32, f32)]) -> Vec<bool> {
        offsets
            .iter()
            .map(|(l, r)| detector.update(&with_ankle_offsets(*l, *r)))
            .collect()
    }

    #[test]
    fn test_first_frame_never_walks() {
        let mut detector = GaitDetector::new(&GaitConfig::default());
        assert!(!detector.update(&neutral_pose()));
        assert_eq!(detector.frames_seen(), 1);
        assert_eq!(detector.events().count(), 0);
    }

    #[test]
    fn test_alternating_steps_confirm_walking() {
        let mut detector = GaitDetector::new(&GaitConfig::default());
        // Left moves, then right, then left: L, R, L events
        let results = feed(
            &mut detector,
            &[(0.0, 0.0), (0.05, 0.0), (0.05, 0.05), (0.0, 0.05)],
        );
        assert_eq!(results, vec![false, false, false, true]);

        let sides: Vec<Side> = detector.events().map(|e| e.side).collect();
        assert_eq!(sides, vec![Side::Left, Side::Right, Side::Left]);
        let frames: Vec<u64> = detector.events().map(|e| e.frame).collect();
        assert_eq!(frames, vec![2, 3, 4]);
    }

    #[test]
    fn test_same_side_never_walks() {
        let mut detector = GaitDetector::new(&GaitConfig::default());
        let offsets: Vec<(f32, f32)> = (0..40)
            .map(|i| (if i % 2 == 0 { 0.0 } else { 0.06 }, 0.0))
            .collect();
        let results = feed(&mut detector, &offsets);
        assert!(results.iter().all(|walking| !walking));
        assert!(detector.events().all(|e| e.side == Side::Left));
    }

    #[test]
    fn test_small_motion_is_not_a_step() {
        let mut detector = GaitDetector::new(&GaitConfig::default());
        let offsets: Vec<(f32, f32)> = (0..10)
            .map(|i| if i % 2 == 0 { (0.0, 0.0) } else { (0.01, -0.01) })
            .collect();
        assert!(feed(&mut detector, &offsets).iter().all(|w| !w));
        assert_eq!(detector.events().count(), 0);
    }

    #[test]
    fn test_body_translation_is_not_a_step() {
        let mut detector = GaitDetector::new(&GaitConfig::default());
        for i in 0..10 {
            let shift = i as f32 * 0.05;
            let kp = BodyPart::ALL.iter().fold(neutral_pose(), |kp, part| {
                let p = kp[*part];
                kp.with(*part, Point2::new(p.x + shift, p.y))
            });
            assert!(!detector.update(&kp));
        }
        assert_eq!(detector.events().count(), 0);
    }

    #[test]
    fn test_same_side_run_breaks_walking() {
        let mut detector = GaitDetector::new(&GaitConfig::default());
        let results = feed(
            &mut detector,
            &[
                (0.0, 0.0),
                (0.05, 0.0),  // L
                (0.05, 0.05), // R
                (0.0, 0.05),  // L -> walking
                (0.05, 0.05), // L -> L, L breaks alternation
            ],
        );
        assert_eq!(results, vec![false, false, false, true, false]);
    }

    #[test]
    fn test_min_alt_steps_is_configurable() {
        let config = GaitConfig {
            min_alt_steps: 2,
            ..GaitConfig::default()
        };
        let mut detector = GaitDetector::new(&config);
        let results = feed(&mut detector, &[(0.0, 0.0), (0.05, 0.0), (0.05, 0.05)]);
        assert_eq!(results, vec![false, false, true]);
    }

    #[test]
    fn test_event_history_is_bounded() {
        let config = GaitConfig {
            history_capacity: 4,
            ..GaitConfig::default()
        };
        let mut detector = GaitDetector::new(&config);
        let offsets: Vec<(f32, f32)> = (0..20)
            .map(|i| if i % 2 == 0 { (0.0, 0.0) } else { (0.05, 0.05) })
            .collect();
        feed(&mut detector, &offsets);
        assert_eq!(detector.events().count(), 4);
        assert_eq!(detector.events().last().map(|e| e.frame), Some(20));
    }

    #[test]
    fn test_reset() {
        let mut detector = GaitDetector::new(&GaitConfig::default());
        feed(&mut detector, &[(0.0, 0.0), (0.05, 0.0), (0.05, 0.05), (0.0, 0.05)]);
        assert!(detector.is_walking());

        detector.reset();
        assert!(!detector.is_walking());
        assert_eq!(detector.frames_seen(), 0);
        assert_eq!(detector.events().count(), 0);
    }
}
