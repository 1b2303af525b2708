// src/services/mod.rs
pub mod baseline;
pub mod metrics;
pub mod predictions;
pub mod refresh;
pub mod report;
pub mod store;
pub mod truth;
pub mod truth_feed;
