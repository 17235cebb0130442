use thiserror::Error;

use crate::tracker::Rect;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("min blob area {min} is not below max blob area {max}")]
    AreaBounds { min: f32, max: f32 },
}

/// Caller contract violations detected by the tracker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error("frame {frame} does not follow previous frame {last}")]
    FrameOrder { last: u32, frame: u32 },
    #[error("detection {index} has invalid geometry: {rect:?}")]
    InvalidDetection { index: usize, rect: Rect },
    #[error("assignment solver failed: {0}")]
    Assignment(String),
}

/// Failure while driving a detection source through the tracker.
#[derive(Debug, Error)]
pub enum PipelineError<E>
where
    E: std::error::Error + 'static,
{
    #[error("detection source failed")]
    Source(#[source] E),
    #[error(transparent)]
    Tracking(#[from] TrackError),
}

/// Check a tunable that must be a finite, non-negative number.
pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}
