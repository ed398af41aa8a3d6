pub mod cli;
pub mod core;
pub mod models;
pub mod platform;

pub use core::analysis_service::AnalysisService;
pub use core::config::{AnalysisConfig, GaitConfig, PoseThresholds, SourceConfig};
pub use core::frame_classifier::FrameClassifier;
pub use core::gait_detector::GaitDetector;
pub use core::video_analyzer::{analyze_video, VideoAnalyzer};
pub use models::analysis::{
    AnalysisOutcome, ErrorResult, FrameClassification, PoseCounts, PoseKind, SummaryRecord,
};
pub use models::pose::{BodyPart, KeypointSet, Point2, PoseError, PoseResult};
pub use platform::pose::{LandmarkBridge, LandmarkFileBridge, MemoryBridge};
