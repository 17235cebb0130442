//! Merging of near candidate boxes within a single frame.

use tracing::trace;

use crate::tracker::rect::Rect;

/// Two boxes are near when their expanded forms overlap with positive area.
#[inline]
pub fn is_near(a: &Rect, b: &Rect, growth_factor: f32) -> bool {
    a.expanded(growth_factor).intersects(&b.expanded(growth_factor))
}

/// Merge near rectangles into their bounding boxes until no pair is near.
///
/// Degenerate input boxes (zero area, negative size, non-finite) are dropped
/// before merging. Pairs are re-scanned on the merged boxes, so the result
/// is a fixed point: clustering it again with the same `growth_factor`
/// returns it unchanged. Negative growth factors are treated as zero.
pub fn cluster(rects: &[Rect], growth_factor: f32) -> Vec<Rect> {
    let growth = growth_factor.max(0.0);
    let mut clusters: Vec<Rect> = rects
        .iter()
        .filter(|r| !r.is_degenerate())
        .copied()
        .collect();

    let dropped = rects.len() - clusters.len();
    if dropped > 0 {
        trace!(dropped, "discarded degenerate rectangles before clustering");
    }

    loop {
        let mut merged = false;
        let mut i = 0;
        while i < clusters.len() {
            let mut j = i + 1;
            while j < clusters.len() {
                if is_near(&clusters[i], &clusters[j], growth) {
                    let other = clusters.remove(j);
                    clusters[i] = clusters[i].union(&other);
                    merged = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        if !merged {
            break;
        }
    }

    trace!(input = rects.len(), output = clusters.len(), "clustered rectangles");
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(cluster(&[], 1.0).is_empty());
    }

    #[test]
    fn test_overlapping_pair_merges_to_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(cluster(&[a, b], 0.0), vec![Rect::new(0.0, 0.0, 15.0, 15.0)]);
    }

    #[test]
    fn test_growth_joins_nearby_boxes() {
        // 4px gap; with factor 1.0 each 10px box grows 5px per side.
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(14.0, 0.0, 10.0, 10.0);
        assert_eq!(cluster(&[a, b], 0.0).len(), 2);
        assert_eq!(cluster(&[a, b], 1.0), vec![Rect::new(0.0, 0.0, 24.0, 10.0)]);
    }

    #[test]
    fn test_chain_collapses_to_single_box() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(40.0, 0.0, 10.0, 10.0),
            Rect::new(8.0, 0.0, 10.0, 10.0),
            Rect::new(16.0, 0.0, 10.0, 10.0),
            Rect::new(24.0, 0.0, 10.0, 10.0),
            Rect::new(32.0, 0.0, 10.0, 10.0),
        ];
        assert_eq!(cluster(&rects, 0.0), vec![Rect::new(0.0, 0.0, 50.0, 10.0)]);
    }

    #[test]
    fn test_merged_box_absorbs_later_neighbour() {
        // c is near neither a nor b alone, only near their union.
        let a = Rect::new(0.0, 0.0, 10.0, 2.0);
        let b = Rect::new(0.0, 1.0, 2.0, 10.0);
        let c = Rect::new(5.0, 8.0, 2.0, 2.0);
        let out = cluster(&[a, c, b], 0.0);
        assert_eq!(out, vec![Rect::new(0.0, 0.0, 10.0, 11.0)]);
        assert_eq!(cluster(&out, 0.0), out);
    }

    #[test]
    fn test_degenerate_boxes_are_dropped() {
        let rects = [
            Rect::new(0.0, 0.0, 0.0, 10.0),
            Rect::new(2.0, 2.0, 5.0, -1.0),
            Rect::new(100.0, 100.0, 5.0, 5.0),
        ];
        assert_eq!(cluster(&rects, 1.0), vec![Rect::new(100.0, 100.0, 5.0, 5.0)]);
    }

    #[test]
    fn test_negative_growth_behaves_as_zero() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(cluster(&[a, b], -3.0), cluster(&[a, b], 0.0));
    }
}
