//! A single object track and its position history.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tracker::predictor::TrajectoryPredictor;
use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Unique track identifier, never reused within a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry of a track's path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub frame: u32,
    pub rect: Rect,
    /// Synthesized by the predictor on a frame without a matching detection
    pub predicted: bool,
}

/// Single object track.
///
/// Created and mutated only by [`TrackManager`](crate::tracker::TrackManager);
/// callers receive cloned snapshots.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    state: TrackState,
    /// Consecutive frames without a matching detection
    occluded_frames: u32,
    /// One point per frame since the track started, frame order
    points: Vec<TrackPoint>,
    predictor: TrajectoryPredictor,
}

impl Track {
    pub(crate) fn new(id: TrackId, frame: u32, rect: Rect) -> Self {
        Self {
            id,
            state: TrackState::Active,
            occluded_frames: 0,
            points: vec![TrackPoint {
                frame,
                rect,
                predicted: false,
            }],
            predictor: TrajectoryPredictor::new(frame, rect),
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn state(&self) -> TrackState {
        self.state
    }

    pub fn occluded_frames(&self) -> u32 {
        self.occluded_frames
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start_frame(&self) -> u32 {
        self.points.first().map_or(0, |p| p.frame)
    }

    pub fn end_frame(&self) -> u32 {
        self.points.last().map_or(0, |p| p.frame)
    }

    /// Box on the most recent frame, detected or predicted.
    pub fn rect(&self) -> Rect {
        self.points.last().map(|p| p.rect).unwrap_or_default()
    }

    /// Path through the box centers, for drawing a polyline.
    pub fn centers(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.points.iter().map(|p| p.rect.center())
    }

    /// Number of points backed by a real detection.
    pub fn detected_len(&self) -> usize {
        self.points.iter().filter(|p| !p.predicted).count()
    }

    /// Expected box on `frame` from the track's motion history.
    pub fn predict(&self, frame: u32) -> Rect {
        self.predictor.predict(frame).unwrap_or_else(|| self.rect())
    }

    pub(crate) fn mark_detected(&mut self, frame: u32, rect: Rect) {
        debug_assert!(self.state.is_live(), "closed track {} updated", self.id);
        debug_assert!(frame > self.end_frame());
        self.points.push(TrackPoint {
            frame,
            rect,
            predicted: false,
        });
        self.predictor.observe(frame, rect);
        self.occluded_frames = 0;
        self.state = TrackState::Active;
    }

    pub(crate) fn mark_occluded(&mut self, frame: u32, predicted: Rect) {
        debug_assert!(self.state.is_live(), "closed track {} updated", self.id);
        debug_assert!(frame > self.end_frame());
        self.points.push(TrackPoint {
            frame,
            rect: predicted,
            predicted: true,
        });
        self.occluded_frames += 1;
        self.state = TrackState::Occluded;
    }

    pub(crate) fn mark_closed(&mut self) {
        self.state = TrackState::Closed;
    }
}
