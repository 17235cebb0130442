use serde::{Deserialize, Serialize};

/// Track state enumeration for the tracking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackState {
    /// Matched a real detection on its latest frame
    #[default]
    Active,
    /// Advancing on predicted positions only
    Occluded,
    /// Terminal, never updated again
    Closed,
}

impl TrackState {
    /// Whether the track still takes part in association.
    #[inline]
    pub fn is_live(self) -> bool {
        self != TrackState::Closed
    }
}
