//! Constant-velocity trajectory extrapolation from recent observations.

use std::collections::VecDeque;

use nalgebra::Vector2;

use crate::tracker::rect::Rect;

/// Number of real observations kept for the velocity estimate.
const HISTORY_LEN: usize = 2;

/// A real (detected, not predicted) position of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub frame: u32,
    pub rect: Rect,
}

/// Center velocity in pixels per frame from the last two observations of `tail`.
///
/// `None` when fewer than two observations exist or they share a frame.
pub fn velocity(tail: &[Observation]) -> Option<Vector2<f32>> {
    let [.., prev, last] = tail else {
        return None;
    };
    let dt = last.frame.checked_sub(prev.frame).filter(|&dt| dt > 0)?;
    Some((last.rect.center_vec() - prev.rect.center_vec()) / dt as f32)
}

/// Expected box on `frame` given the recent observations of a track, oldest first.
///
/// The center moves at the finite-difference velocity for the number of
/// frames since the last observation; the size of the last observation is
/// carried forward. A single observation is returned unchanged and an empty
/// tail yields `None`.
pub fn extrapolate(tail: &[Observation], frame: u32) -> Option<Rect> {
    let last = tail.last()?;
    let Some(v) = velocity(tail) else {
        return Some(last.rect);
    };
    let elapsed = frame.saturating_sub(last.frame) as f32;
    let center = last.rect.center_vec() + v * elapsed;
    Some(Rect::from_center(
        center.x,
        center.y,
        last.rect.width,
        last.rect.height,
    ))
}

/// Per-track motion model fed only with matched detections.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryPredictor {
    history: VecDeque<Observation>,
}

impl TrajectoryPredictor {
    pub fn new(frame: u32, rect: Rect) -> Self {
        let mut predictor = Self {
            history: VecDeque::with_capacity(HISTORY_LEN),
        };
        predictor.observe(frame, rect);
        predictor
    }

    /// Record a real observation; the oldest one falls out of the window.
    pub fn observe(&mut self, frame: u32, rect: Rect) {
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(Observation { frame, rect });
    }

    pub fn velocity(&self) -> Option<Vector2<f32>> {
        velocity(&self.tail())
    }

    /// Predicted box for `frame`, `None` only before the first observation.
    pub fn predict(&self, frame: u32) -> Option<Rect> {
        extrapolate(&self.tail(), frame)
    }

    pub fn last_observation(&self) -> Option<&Observation> {
        self.history.back()
    }

    fn tail(&self) -> Vec<Observation> {
        self.history.iter().copied().collect()
    }
}
