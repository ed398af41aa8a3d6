// Pose estimation platform integration
// Provides the landmark bridge and its in-memory and file-backed sources

pub mod landmark_bridge;
pub mod landmark_file;

pub use landmark_bridge::{FrameLandmarks, FrameStream, LandmarkBridge, MemoryBridge, MemoryStream};
pub use landmark_file::{LandmarkFileBridge, LandmarkFileStream};
