use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box with format conversion and geometry helpers.
///
/// Stored in TLWH form (top-left x, top-left y, width, height).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Create a Rect of the given size centered on `(cx, cy)`.
    #[inline]
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Center point as a vector, for motion arithmetic.
    #[inline]
    pub fn center_vec(&self) -> Vector2<f32> {
        let (cx, cy) = self.center();
        Vector2::new(cx, cy)
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Finite coordinates and non-negative dimensions.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// True when the box cannot represent a region: invalid or zero-area.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.is_valid() || self.width <= 0.0 || self.height <= 0.0
    }

    /// Area of the overlap with another box, zero when they are disjoint or only touch.
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let inter_width = (x2 - x1).max(0.0);
        let inter_height = (y2 - y1).max(0.0);
        inter_width * inter_height
    }

    /// Whether the two boxes overlap with positive area.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection_area(other) > 0.0
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let [ax1, ay1, ax2, ay2] = self.to_tlbr();
        let [bx1, by1, bx2, by2] = other.to_tlbr();
        Rect::from_tlbr(ax1.min(bx1), ay1.min(by1), ax2.max(bx2), ay2.max(by2))
    }

    /// Grow the box symmetrically around its center by `factor` of each dimension.
    ///
    /// Every side moves out by `factor / 2 * dimension`, so the result is
    /// `(1 + factor)` times as wide and as tall.
    pub fn expanded(&self, factor: f32) -> Rect {
        let dx = self.width * factor / 2.0;
        let dy = self.height * factor / 2.0;
        Rect {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + 2.0 * dx,
            height: self.height + 2.0 * dy,
        }
    }

    /// Euclidean distance between the two centers.
    #[inline]
    pub fn center_distance(&self, other: &Rect) -> f32 {
        (self.center_vec() - other.center_vec()).norm()
    }
}
