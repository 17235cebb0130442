//! Per-class blob filtering and occluder suppression.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, non_negative};
use crate::integration::Blob;
use crate::tracker::{Rect, cluster};

/// Size gate and merge aggressiveness for one detection class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobFilter {
    /// Passed to [`cluster`]; 0 merges only overlapping boxes
    pub growth_factor: f32,
    /// Blobs must have a contour area strictly above this
    pub min_blob_area: f32,
    /// and strictly below this
    pub max_blob_area: f32,
}

impl Default for BlobFilter {
    fn default() -> Self {
        Self::ball()
    }
}

impl BlobFilter {
    pub fn ball() -> Self {
        Self {
            growth_factor: 0.5,
            min_blob_area: 50.0,
            max_blob_area: 500.0,
        }
    }

    pub fn player() -> Self {
        Self {
            growth_factor: 1.0,
            min_blob_area: 20.0,
            max_blob_area: 10_000.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("growth_factor", self.growth_factor)?;
        non_negative("min_blob_area", self.min_blob_area)?;
        non_negative("max_blob_area", self.max_blob_area)?;
        if self.min_blob_area >= self.max_blob_area {
            return Err(ConfigError::AreaBounds {
                min: self.min_blob_area,
                max: self.max_blob_area,
            });
        }
        Ok(())
    }

    /// Whether the blob's contour area lies strictly inside the bounds.
    #[inline]
    pub fn accepts(&self, blob: &Blob) -> bool {
        blob.area > self.min_blob_area && blob.area < self.max_blob_area
    }

    /// Area-gate the blobs, then merge the survivors into clusters.
    pub fn apply(&self, blobs: &[Blob]) -> Vec<Rect> {
        let boxes: Vec<Rect> = blobs
            .iter()
            .filter(|b| self.accepts(b))
            .map(|b| b.bbox)
            .collect();
        cluster(&boxes, self.growth_factor)
    }
}

/// Drop every box that overlaps any occluder with positive area.
///
/// A ball hidden behind a player is treated as occluded rather than detected.
pub fn remove_occluded(objects: Vec<Rect>, occluders: &[Rect]) -> Vec<Rect> {
    objects
        .into_iter()
        .filter(|o| !occluders.iter().any(|p| o.intersects(p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_bounds_are_exclusive() {
        let filter = BlobFilter::ball();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!filter.accepts(&Blob::new(rect, 50.0)));
        assert!(filter.accepts(&Blob::new(rect, 50.5)));
        assert!(!filter.accepts(&Blob::new(rect, 500.0)));
    }

    #[test]
    fn test_apply_filters_then_clusters() {
        let filter = BlobFilter {
            growth_factor: 0.0,
            min_blob_area: 10.0,
            max_blob_area: 1000.0,
        };
        let blobs = [
            Blob::new(Rect::new(0.0, 0.0, 10.0, 10.0), 80.0),
            Blob::new(Rect::new(5.0, 5.0, 10.0, 10.0), 80.0),
            // Too small, would otherwise bridge to the far box
            Blob::new(Rect::new(14.0, 0.0, 30.0, 2.0), 5.0),
            Blob::new(Rect::new(40.0, 0.0, 10.0, 10.0), 80.0),
        ];
        assert_eq!(
            filter.apply(&blobs),
            vec![Rect::new(0.0, 0.0, 15.0, 15.0), Rect::new(40.0, 0.0, 10.0, 10.0)]
        );
    }

    #[test]
    fn test_remove_occluded() {
        let player = Rect::new(100.0, 100.0, 40.0, 80.0);
        let hidden = Rect::new(120.0, 150.0, 5.0, 5.0);
        let touching = Rect::new(95.0, 100.0, 5.0, 5.0);
        let free = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert_eq!(
            remove_occluded(vec![hidden, touching, free], &[player]),
            vec![touching, free]
        );
    }

    #[test]
    fn test_validate() {
        assert!(BlobFilter::player().validate().is_ok());
        let inverted = BlobFilter {
            min_blob_area: 600.0,
            ..BlobFilter::ball()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::AreaBounds {
                min: 600.0,
                max: 500.0
            })
        );
        let negative = BlobFilter {
            growth_factor: -0.5,
            ..BlobFilter::ball()
        };
        assert!(negative.validate().is_err());
    }
}
