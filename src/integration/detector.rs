//! Trait for the upstream vision stage that produces candidate blobs.

use serde::{Deserialize, Serialize};

use crate::tracker::Rect;

/// A candidate region found by contour extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    /// Bounding box of the contour
    pub bbox: Rect,
    /// Area enclosed by the contour, which may be smaller than the box area
    pub area: f32,
}

impl Blob {
    pub fn new(bbox: Rect, area: f32) -> Self {
        Self { bbox, area }
    }
}

impl From<Rect> for Blob {
    /// A blob filling its whole bounding box.
    fn from(bbox: Rect) -> Self {
        Self {
            bbox,
            area: bbox.area(),
        }
    }
}

/// Everything the vision stage found on one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameDetections {
    /// Candidates for the tracked object (the ball)
    pub objects: Vec<Blob>,
    /// Foreground objects that can hide the ball (players)
    pub occluders: Vec<Blob>,
}

impl FrameDetections {
    pub fn new(objects: Vec<Blob>, occluders: Vec<Blob>) -> Self {
        Self { objects, occluders }
    }
}

/// Source of per-frame detections, typically a capture and segmentation loop.
///
/// # Example
///
/// ```ignore
/// use ball_track::{DetectionSource, FrameDetections};
///
/// struct ContourStage {
///     // Capture handle, thresholds, ...
/// }
///
/// impl DetectionSource for ContourStage {
///     type Error = std::io::Error;
///
///     fn next_frame(&mut self) -> Result<Option<FrameDetections>, Self::Error> {
///         // Grab, segment and extract contours; `None` once the video ends
///         Ok(None)
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for capture or segmentation failures.
    type Error: std::error::Error + 'static;

    /// Detections for the next frame, or `None` when capture has ended.
    fn next_frame(&mut self) -> Result<Option<FrameDetections>, Self::Error>;
}

impl<I> DetectionSource for I
where
    I: Iterator<Item = FrameDetections>,
{
    type Error = std::convert::Infallible;

    fn next_frame(&mut self) -> Result<Option<FrameDetections>, Self::Error> {
        Ok(self.next())
    }
}
