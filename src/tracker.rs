mod cluster;
mod matching;
mod predictor;
mod rect;
mod track;
mod track_manager;
mod track_state;

pub use cluster::{cluster, is_near};
pub use matching::{AssignmentResult, Matcher, center_distance, greedy_assignment, linear_assignment};
pub use predictor::{Observation, TrajectoryPredictor, extrapolate, velocity};
pub use rect::Rect;
pub use track::{Track, TrackId, TrackPoint};
pub use track_manager::{TrackManager, TrackerConfig};
pub use track_state::TrackState;
