//! Frame-by-frame association, spawning and retirement of tracks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ConfigError, TrackError, non_negative};
use crate::tracker::matching::{self, AssignmentResult, Matcher};
use crate::tracker::rect::Rect;
use crate::tracker::track::{Track, TrackId};

/// Configuration for a [`TrackManager`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Max distance between a predicted center and a detection center for a match
    pub association_threshold: f32,
    /// Consecutive occluded frames tolerated before a track is closed
    pub max_occlusion_age: u32,
    pub matcher: Matcher,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            association_threshold: 40.0,
            max_occlusion_age: 5,
            matcher: Matcher::Greedy,
        }
    }
}

impl TrackerConfig {
    /// Settings for large, slow occluders (players) rather than the ball.
    pub fn occluder() -> Self {
        Self {
            association_threshold: 120.0,
            max_occlusion_age: 15,
            matcher: Matcher::Optimal,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("association_threshold", self.association_threshold)
    }
}

/// Owns every live track and advances them one frame at a time.
#[derive(Debug, Clone)]
pub struct TrackManager {
    tracks: BTreeMap<TrackId, Track>,
    next_id: u64,
    last_frame: Option<u32>,
    config: TrackerConfig,
}

impl Default for TrackManager {
    fn default() -> Self {
        Self {
            tracks: BTreeMap::new(),
            next_id: 0,
            last_frame: None,
            config: TrackerConfig::default(),
        }
    }
}

impl TrackManager {
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Last frame passed to [`update`](Self::update).
    pub fn last_frame(&self) -> Option<u32> {
        self.last_frame
    }

    /// Live (Active or Occluded) tracks in id order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Process the detections of `frame`.
    ///
    /// Returns the live tracks plus those closed by this call, in id order.
    /// A closed track is returned exactly once. Frames must strictly increase
    /// and detections must have finite, non-negative geometry; a rejected call
    /// leaves the manager untouched.
    pub fn update(&mut self, frame: u32, detections: &[Rect]) -> Result<Vec<Track>, TrackError> {
        if let Some(last) = self.last_frame {
            if frame <= last {
                return Err(TrackError::FrameOrder { last, frame });
            }
        }
        if let Some((index, rect)) = detections.iter().enumerate().find(|(_, r)| !r.is_valid()) {
            return Err(TrackError::InvalidDetection { index, rect: *rect });
        }

        // Step 1: predict every live track onto this frame
        let ids: Vec<TrackId> = self.tracks.keys().copied().collect();
        let predictions: Vec<Rect> = self.tracks.values().map(|t| t.predict(frame)).collect();

        // Step 2: associate by center distance
        let dists = matching::center_distance(&predictions, detections);
        let thresh = self.config.association_threshold;
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = match self.config.matcher {
            Matcher::Greedy => matching::greedy_assignment(&dists, thresh),
            Matcher::Optimal => matching::linear_assignment(&dists, thresh)?,
        };
        self.last_frame = Some(frame);

        // Step 3: matched tracks take their detection
        for (itrack, idet) in matches {
            if let Some(track) = self.tracks.get_mut(&ids[itrack]) {
                let distance = dists[[itrack, idet]];
                trace!(frame, track = %track.id(), distance, "associated");
                track.mark_detected(frame, detections[idet]);
            }
        }

        // Step 4: unmatched tracks coast on their prediction
        let mut closed = Vec::new();
        for itrack in unmatched_tracks {
            let id = ids[itrack];
            let Some(track) = self.tracks.get_mut(&id) else {
                continue;
            };
            track.mark_occluded(frame, predictions[itrack]);
            if track.occluded_frames() > self.config.max_occlusion_age {
                track.mark_closed();
                closed.push(id);
            }
        }
        let mut output: Vec<Track> = Vec::with_capacity(self.tracks.len() + detections.len());
        for id in closed {
            if let Some(track) = self.tracks.remove(&id) {
                debug!(frame, track = %id, points = track.len(), "closed track");
                output.push(track);
            }
        }

        // Step 5: leftover detections start new tracks
        for idet in unmatched_detections {
            let id = self.spawn(frame, detections[idet]);
            debug!(frame, track = %id, "started track");
        }

        output.extend(self.tracks.values().cloned());
        output.sort_by_key(|t| t.id());
        Ok(output)
    }

    /// End of capture: close every live track and hand them back.
    pub fn finish(mut self) -> Vec<Track> {
        let tracks = std::mem::take(&mut self.tracks);
        tracks
            .into_values()
            .map(|mut track| {
                track.mark_closed();
                track
            })
            .collect()
    }

    fn spawn(&mut self, frame: u32, rect: Rect) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        self.tracks.insert(id, Track::new(id, frame, rect));
        id
    }
}
