pub mod config;
pub mod geometry;
pub mod history;

// Pose classification
pub mod pose_predicates;
pub mod gait_detector;
pub mod frame_classifier;

// Video analysis
pub mod video_analyzer;
pub mod analysis_service;
