//! Detection clustering and multi-target tracking for a small, fast-moving
//! object (a ball) seen through noisy, intermittent per-frame detections.
//!
//! Per frame, raw candidate boxes are merged with [`cluster`], matched to
//! live tracks by [`TrackManager::update`] using each track's
//! [`TrajectoryPredictor`], and tracks without a match coast on their
//! predicted position until they exceed the configured occlusion age.

pub mod error;
pub mod integration;
pub mod tracker;

pub use error::{ConfigError, PipelineError, TrackError};
pub use integration::{
    Blob, BlobBuilder, BlobFilter, DetectionSource, FrameDetections, FrameOutput, PipelineConfig,
    TrackerPipeline,
};
pub use tracker::{
    Matcher, Rect, Track, TrackId, TrackManager, TrackPoint, TrackState, TrackerConfig,
    TrajectoryPredictor, cluster,
};
