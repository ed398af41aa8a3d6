// Data models for body landmarks, pose classification, and analysis results

pub mod analysis;
pub mod pose;
