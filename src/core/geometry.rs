use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Axis-aligned pixel box. `(x0, y0)` is the top-left corner, y grows downwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Builds a box from two arbitrary corners, swapping coordinates as needed.
    pub fn from_corners(xa: f32, ya: f32, xb: f32, yb: f32) -> Self {
        Self {
            x0: xa.min(xb),
            y0: ya.min(yb),
            x1: xa.max(xb),
            y1: ya.max(yb),
        }
    }

    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) * 0.5
    }

    /// Vertical midpoint used by the cluster tests: `y0 + (y1 - y0) / 2`.
    pub fn mid_y(&self) -> f32 {
        self.y0 + (self.y1 - self.y0) / 2.0
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Open-interval overlap on the x axis; touching edges do not count.
    pub fn overlaps_horizontally(&self, other: &Self) -> bool {
        self.x0 < other.x1 && self.x1 > other.x0
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Total order top-to-bottom, then left-to-right.
    pub fn cmp_top_left(&self, other: &Self) -> Ordering {
        self.y0
            .total_cmp(&other.y0)
            .then(self.x0.total_cmp(&other.x0))
            .then(self.y1.total_cmp(&other.y1))
            .then(self.x1.total_cmp(&other.x1))
    }

    /// Total order left-to-right, then top-to-bottom.
    pub fn cmp_left_top(&self, other: &Self) -> Ordering {
        self.x0
            .total_cmp(&other.x0)
            .then(self.y0.total_cmp(&other.y0))
            .then(self.x1.total_cmp(&other.x1))
            .then(self.y1.total_cmp(&other.y1))
    }
}
