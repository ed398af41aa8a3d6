// Landmark bridge - the seam to the upstream pose estimator
//
// The estimator (video decoding plus landmark inference) runs outside this
// crate. A bridge opens one video by identifier and yields its frames in
// order, each either a complete keypoint set or a detection miss.

use crate::models::pose::{KeypointSet, PoseError, PoseResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Landmarks for one decoded frame. `None` means nothing usable was detected.
pub type FrameLandmarks = Option<KeypointSet>;

/// Ordered frames of one opened video
pub trait FrameStream: Send {
    /// Next frame, or `Ok(None)` once the video is exhausted
    fn next_frame(&mut self) -> PoseResult<Option<FrameLandmarks>>;
}

/// Bridge trait. Implement this for each upstream landmark producer.
pub trait LandmarkBridge: Send + Sync {
    /// Open a video. Fails with `SourceUnavailable` if it cannot be read at all.
    fn open(&self, video: &str) -> PoseResult<Box<dyn FrameStream>>;

    /// Get bridge info
    fn get_bridge_info(&self) -> String;
}

// ==============================================================================
// In-memory Implementation
// ==============================================================================

/// Frames already held in memory
pub struct MemoryStream {
    frames: Arc<Vec<FrameLandmarks>>,
    position: usize,
}

impl MemoryStream {
    pub fn new(frames: Vec<FrameLandmarks>) -> Self {
        Self::shared(Arc::new(frames))
    }

    fn shared(frames: Arc<Vec<FrameLandmarks>>) -> Self {
        Self {
            frames,
            position: 0,
        }
    }
}

impl FrameStream for MemoryStream {
    fn next_frame(&mut self) -> PoseResult<Option<FrameLandmarks>> {
        let frame = self.frames.get(self.position).copied();
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }
}

/// Bridge over named in-memory videos
#[derive(Default)]
pub struct MemoryBridge {
    videos: HashMap<String, Arc<Vec<FrameLandmarks>>>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a video
    pub fn insert(&mut self, video: impl Into<String>, frames: Vec<FrameLandmarks>) {
        self.videos.insert(video.into(), Arc::new(frames));
    }

    pub fn with_video(mut self, video: impl Into<String>, frames: Vec<FrameLandmarks>) -> Self {
        self.insert(video, frames);
        self
    }
}

impl LandmarkBridge for MemoryBridge {
    fn open(&self, video: &str) -> PoseResult<Box<dyn FrameStream>> {
        let frames = self
            .videos
            .get(video)
            .cloned()
            .ok_or_else(|| PoseError::SourceUnavailable {
                video: video.to_string(),
                reason: "no such video".to_string(),
            })?;
        Ok(Box::new(MemoryStream::shared(frames)))
    }

    fn get_bridge_info(&self) -> String {
        format!("In-memory landmarks ({} videos)", self.videos.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pose::fixtures::neutral_pose;

    #[test]
    fn test_memory_stream_yields_frames_in_order() {
        let kp = neutral_pose();
        let mut stream = MemoryStream::new(vec![Some(kp), None, Some(kp)]);

        assert_eq!(stream.next_frame().unwrap(), Some(Some(kp)));
        assert_eq!(stream.next_frame().unwrap(), Some(None));
        assert_eq!(stream.next_frame().unwrap(), Some(Some(kp)));
        assert_eq!(stream.next_frame().unwrap(), None);
        assert_eq!(stream.next_frame().unwrap(), None);
    }

    #[test]
    fn test_memory_bridge_opens_independent_streams() {
        let bridge = MemoryBridge::new().with_video("clip", vec![None, None]);

        let mut first = bridge.open("clip").unwrap();
        first.next_frame().unwrap();
        let mut second = bridge.open("clip").unwrap();
        assert_eq!(second.next_frame().unwrap(), Some(None));
        assert_eq!(second.next_frame().unwrap(), Some(None));
        assert_eq!(second.next_frame().unwrap(), None);
        assert!(bridge.get_bridge_info().contains("1 videos"));
    }

    #[test]
    fn test_memory_bridge_unknown_video() {
        let bridge = MemoryBridge::new();
        let err = bridge.open("missing.mp4").err().unwrap();
        assert!(matches!(err, PoseError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("missing.mp4"));
    }
}
