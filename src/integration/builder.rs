//! Builder for creating Blob objects from various box formats.

use crate::integration::Blob;
use crate::tracker::Rect;

/// Builder for creating [`Blob`]s from TLBR, TLWH or center-based boxes.
#[derive(Debug, Clone, Default)]
pub struct BlobBuilder {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    area: Option<f32>,
}

impl BlobBuilder {
    /// Create a new blob builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Set the contour area; defaults to the box area.
    pub fn area(mut self, area: f32) -> Self {
        self.area = Some(area);
        self
    }

    /// Build the final `Blob`.
    pub fn build(self) -> Blob {
        let bbox = Rect::from_tlbr(self.x1, self.y1, self.x2, self.y2);
        Blob {
            bbox,
            area: self.area.unwrap_or_else(|| bbox.area()),
        }
    }
}
