// Video analysis - drives the frame classifier over one video and
// aggregates pose counts into a summary

use crate::core::config::AnalysisConfig;
use crate::core::frame_classifier::FrameClassifier;
use crate::models::analysis::{AnalysisOutcome, PoseCounts, SummaryRecord};
use crate::models::pose::{KeypointSet, PoseError, PoseResult};
use crate::platform::pose::{FrameStream, LandmarkBridge};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Aggregates per-frame classifications into a `SummaryRecord`.
///
/// Every call to `analyze` builds a fresh classifier and gait detector, so a
/// single analyzer can be reused for any number of videos.
pub struct VideoAnalyzer {
    config: AnalysisConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl VideoAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Stop between frames once `flag` is raised. A cancelled run yields
    /// `PoseError::Cancelled` and no summary.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Open `video` through the bridge and analyze every frame
    pub fn analyze(&self, bridge: &dyn LandmarkBridge, video: &str) -> PoseResult<SummaryRecord> {
        let mut stream = bridge.open(video)?;
        self.analyze_stream(video, stream.as_mut())
    }

    /// Analyze an already opened stream
    pub fn analyze_stream(
        &self,
        video: &str,
        stream: &mut dyn FrameStream,
    ) -> PoseResult<SummaryRecord> {
        let mut classifier = FrameClassifier::new(&self.config);
        let mut counts = PoseCounts::default();
        let mut total_frames: u64 = 0;
        let mut detected_frames: u64 = 0;
        // Last detected frame; carried across detection gaps
        let mut previous: Option<KeypointSet> = None;

        loop {
            if self.is_cancelled() {
                tracing::debug!(video, total_frames, "analysis cancelled");
                return Err(PoseError::Cancelled(video.to_string()));
            }

            let frame = match stream.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(
                        video,
                        total_frames,
                        error = %e,
                        "frame read failed, ending stream"
                    );
                    break;
                }
            };

            total_frames += 1;

            if let Some(kp) = frame {
                detected_frames += 1;
                let classification = classifier.classify(&kp, previous.as_ref());
                counts.record(&classification);
                previous = Some(kp);
            }
        }

        tracing::debug!(
            video,
            total_frames,
            detected_frames,
            dominant = counts.dominant().map(|p| p.to_string()),
            "analysis complete"
        );

        Ok(SummaryRecord {
            video: video.to_string(),
            total_frames,
            poses_detected: counts,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Analyze one video and return either its summary or an error payload
pub fn analyze_video(
    bridge: &dyn LandmarkBridge,
    video: &str,
    config: &AnalysisConfig,
) -> AnalysisOutcome {
    VideoAnalyzer::new(config.clone()).analyze(bridge, video).into()
}
