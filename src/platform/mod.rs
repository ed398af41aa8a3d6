// Upstream landmark producers
pub mod pose;
