//! Integration module for connecting the upstream vision stage with the tracker.
//!
//! The vision stage (capture, segmentation, contour extraction) lives outside
//! this crate and reaches it through [`DetectionSource`]. This module applies
//! the per-class blob filters, suppresses ball candidates hidden by players
//! and feeds the survivors to a [`TrackManager`](crate::tracker::TrackManager).

mod builder;
mod detector;
mod filter;
mod pipeline;

pub use builder::BlobBuilder;
pub use detector::{Blob, DetectionSource, FrameDetections};
pub use filter::{BlobFilter, remove_occluded};
pub use pipeline::{FrameOutput, PipelineConfig, TrackerPipeline};
