//! TrackerPipeline for combining the vision stage with tracking.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, PipelineError, TrackError};
use crate::integration::filter::{BlobFilter, remove_occluded};
use crate::integration::{DetectionSource, FrameDetections};
use crate::tracker::{Rect, Track, TrackManager, TrackState, TrackerConfig};

/// Configuration for a [`TrackerPipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub objects: BlobFilter,
    pub occluders: BlobFilter,
    pub tracker: TrackerConfig,
    /// Also track the occluders with their own manager
    pub occluder_tracker: Option<TrackerConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            objects: BlobFilter::ball(),
            occluders: BlobFilter::player(),
            tracker: TrackerConfig::default(),
            occluder_tracker: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.objects.validate()?;
        self.occluders.validate()?;
        self.tracker.validate()?;
        if let Some(config) = &self.occluder_tracker {
            config.validate()?;
        }
        Ok(())
    }
}

/// Result of one processed frame, ready for drawing.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub frame: u32,
    /// Object tracks, including those closed on this frame
    pub tracks: Vec<Track>,
    /// Clustered occluder boxes
    pub occluders: Vec<Rect>,
    /// Occluder tracks when occluder tracking is enabled
    pub occluder_tracks: Vec<Track>,
}

/// Runs a [`DetectionSource`] through clustering, occluder suppression and tracking.
pub struct TrackerPipeline<D: DetectionSource> {
    source: D,
    config: PipelineConfig,
    tracker: TrackManager,
    occluder_tracker: Option<TrackManager>,
    frame: u32,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a new pipeline; rejects invalid configuration.
    pub fn new(source: D, config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let tracker = TrackManager::new(config.tracker.clone())?;
        let occluder_tracker = config
            .occluder_tracker
            .clone()
            .map(TrackManager::new)
            .transpose()?;
        Ok(Self {
            source,
            config,
            tracker,
            occluder_tracker,
            frame: 0,
        })
    }

    /// Create a new pipeline with default configuration.
    pub fn with_default_config(source: D) -> Self {
        Self {
            source,
            config: PipelineConfig::default(),
            tracker: TrackManager::default(),
            occluder_tracker: None,
            frame: 0,
        }
    }

    /// Feed one frame's detections directly, bypassing the source.
    ///
    /// Frames are numbered from 1 in call order.
    pub fn process(&mut self, detections: FrameDetections) -> Result<FrameOutput, TrackError> {
        let frame = self.frame + 1;

        let occluders = self.config.occluders.apply(&detections.occluders);
        let candidates = self.config.objects.apply(&detections.objects);
        let candidate_count = candidates.len();
        let objects = remove_occluded(candidates, &occluders);
        debug!(
            frame,
            raw = detections.objects.len(),
            candidates = candidate_count,
            visible = objects.len(),
            occluders = occluders.len(),
            "filtered detections"
        );

        let occluder_tracks = match self.occluder_tracker.as_mut() {
            Some(tracker) => tracker.update(frame, &occluders)?,
            None => Vec::new(),
        };
        let tracks = self.tracker.update(frame, &objects)?;
        self.frame = frame;

        Ok(FrameOutput {
            frame,
            tracks,
            occluders,
            occluder_tracks,
        })
    }

    /// Pull and process the next frame; `None` once the source is exhausted.
    pub fn process_next(&mut self) -> Result<Option<FrameOutput>, PipelineError<D::Error>> {
        match self.source.next_frame().map_err(PipelineError::Source)? {
            Some(detections) => Ok(Some(self.process(detections)?)),
            None => Ok(None),
        }
    }

    /// Drive the source to the end, handing every frame to `on_frame`.
    ///
    /// Returns every object track of the run, closed, in id order.
    pub fn run<F>(mut self, mut on_frame: F) -> Result<Vec<Track>, PipelineError<D::Error>>
    where
        F: FnMut(&FrameOutput),
    {
        let mut finished = Vec::new();
        while let Some(output) = self.process_next()? {
            on_frame(&output);
            finished.extend(
                output
                    .tracks
                    .into_iter()
                    .filter(|t| t.state() == TrackState::Closed),
            );
        }
        finished.extend(self.finish());
        finished.sort_by_key(|t| t.id());
        Ok(finished)
    }

    /// Capture ended: close the live object tracks and return them.
    pub fn finish(self) -> Vec<Track> {
        debug!(frames = self.frame, live = self.tracker.len(), "capture ended");
        self.tracker.finish()
    }

    /// Number of frames processed so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }

    /// Get a reference to the object tracker.
    pub fn tracker(&self) -> &TrackManager {
        &self.tracker
    }

    /// Get a reference to the occluder tracker, if enabled.
    pub fn occluder_tracker(&self) -> Option<&TrackManager> {
        self.occluder_tracker.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::{Blob, BlobBuilder};

    #[derive(Debug, thiserror::Error)]
    #[error("camera disconnected")]
    struct Disconnected;

    struct FailingSource {
        remaining: u32,
    }

    impl DetectionSource for FailingSource {
        type Error = Disconnected;

        fn next_frame(&mut self) -> Result<Option<FrameDetections>, Self::Error> {
            if self.remaining == 0 {
                return Err(Disconnected);
            }
            self.remaining -= 1;
            Ok(Some(FrameDetections::default()))
        }
    }

    fn ball_at(x: f32, y: f32) -> Blob {
        BlobBuilder::new().tlwh(x, y, 10.0, 10.0).build()
    }

    #[test]
    fn test_tracker_pipeline() {
        let frames = vec![
            FrameDetections::new(vec![ball_at(10.0, 20.0)], vec![]),
            FrameDetections::new(vec![ball_at(14.0, 22.0)], vec![]),
        ];
        let mut pipeline = TrackerPipeline::with_default_config(frames.into_iter());

        let first = pipeline.process_next().unwrap().unwrap();
        assert_eq!(first.frame, 1);
        assert_eq!(first.tracks.len(), 1);

        let second = pipeline.process_next().unwrap().unwrap();
        assert_eq!(second.tracks.len(), 1);
        assert_eq!(second.tracks[0].id(), first.tracks[0].id());
        assert_eq!(second.tracks[0].detected_len(), 2);

        assert!(pipeline.process_next().unwrap().is_none());
    }

    #[test]
    fn test_ball_behind_player_is_occluded() {
        let player = BlobBuilder::new().tlwh(100.0, 100.0, 40.0, 80.0).area(2500.0).build();
        let frames = vec![
            FrameDetections::new(vec![ball_at(60.0, 120.0)], vec![player]),
            FrameDetections::new(vec![ball_at(110.0, 120.0)], vec![player]),
        ];
        let mut pipeline = TrackerPipeline::with_default_config(frames.into_iter());
        pipeline.process_next().unwrap();
        let output = pipeline.process_next().unwrap().unwrap();
        assert_eq!(output.occluders.len(), 1);
        assert_eq!(output.tracks.len(), 1);
        assert_eq!(output.tracks[0].state(), TrackState::Occluded);
    }

    #[test]
    fn test_occluder_tracking() {
        let config = PipelineConfig {
            occluder_tracker: Some(TrackerConfig::occluder()),
            ..Default::default()
        };
        let player = |x: f32| BlobBuilder::new().tlwh(x, 100.0, 40.0, 80.0).area(2500.0).build();
        let frames = vec![
            FrameDetections::new(vec![], vec![player(100.0)]),
            FrameDetections::new(vec![], vec![player(110.0)]),
        ];
        let mut pipeline = TrackerPipeline::new(frames.into_iter(), config).unwrap();
        pipeline.process_next().unwrap();
        let output = pipeline.process_next().unwrap().unwrap();
        assert!(output.tracks.is_empty());
        assert_eq!(output.occluder_tracks.len(), 1);
        assert_eq!(output.occluder_tracks[0].len(), 2);
        assert_eq!(pipeline.occluder_tracker().map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_source_error_is_wrapped() {
        let mut pipeline = TrackerPipeline::with_default_config(FailingSource { remaining: 1 });
        assert!(pipeline.process_next().is_ok());
        assert!(matches!(
            pipeline.process_next(),
            Err(PipelineError::Source(Disconnected))
        ));
        assert_eq!(pipeline.frame(), 1);
    }

    #[test]
    fn test_run_returns_all_tracks_closed() {
        let frames = vec![
            FrameDetections::new(vec![ball_at(10.0, 10.0), ball_at(300.0, 300.0)], vec![]),
            FrameDetections::new(vec![ball_at(12.0, 10.0)], vec![]),
        ];
        let mut seen = 0;
        let tracks = TrackerPipeline::with_default_config(frames.into_iter())
            .run(|_| seen += 1)
            .unwrap();
        assert_eq!(seen, 2);
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| t.state() == TrackState::Closed));
        assert_eq!(tracks[0].detected_len(), 2);
        assert_eq!(tracks[1].detected_len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = PipelineConfig {
            occluders: BlobFilter {
                min_blob_area: 10.0,
                max_blob_area: 5.0,
                ..BlobFilter::player()
            },
            ..Default::default()
        };
        assert!(TrackerPipeline::new(std::iter::empty::<FrameDetections>(), config).is_err());
    }
}
