//! Shared geometry for frame rasterization
//!
//! Maps world coordinates to pixels and holds the stroke constants the
//! rasterizer uses for each shape.

use crate::domain::{FRAME_HEIGHT, Vec2};

/// Reference frame height the pixel constants below are tuned for
pub const REFERENCE_HEIGHT: f32 = 720.0;

/// Arrow geometry constants
pub mod arrow {
    /// Arrow shaft thickness in reference pixels
    pub const THICKNESS: f32 = 4.0;
    /// Arrowhead size in reference pixels
    pub const HEAD_SIZE: f32 = 12.0;
    /// Arrowhead angle from shaft in radians (35 degrees)
    pub const HEAD_ANGLE: f32 = 0.610_865_2; // 35.0_f32.to_radians()
    /// Minimum arrow length (pixels) for a head to be drawn
    pub const MIN_LENGTH: f32 = 2.0;

    /// Calculate arrow head points given start, end, and head size
    /// Returns (head1_x, head1_y, head2_x, head2_y) for the two head lines
    pub fn head_points(
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
        head_size: f32,
    ) -> Option<(f32, f32, f32, f32)> {
        let dx = end_x - start_x;
        let dy = end_y - start_y;
        let length = (dx * dx + dy * dy).sqrt();
        if length < MIN_LENGTH {
            return None;
        }

        // Unit direction vector (pointing from start to end)
        let nx = dx / length;
        let ny = dy / length;

        let (sin_a, cos_a) = HEAD_ANGLE.sin_cos();

        let head1_x = end_x + (-nx * cos_a + ny * sin_a) * head_size;
        let head1_y = end_y + (-nx * sin_a - ny * cos_a) * head_size;
        let head2_x = end_x + (-nx * cos_a - ny * sin_a) * head_size;
        let head2_y = end_y + (nx * sin_a - ny * cos_a) * head_size;

        Some((head1_x, head1_y, head2_x, head2_y))
    }
}

/// Outline (circle, line, number line) constants
pub mod shape {
    /// Default stroke thickness in reference pixels
    pub const THICKNESS: f32 = 3.0;
    /// Number-line tick thickness in reference pixels
    pub const TICK_THICKNESS: f32 = 2.0;
    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;
    /// Segments used for partially drawn arcs
    pub const ARC_SEGMENTS: usize = 64;
}

/// Placeholder bar height relative to the text line height
pub const PLACEHOLDER_HEIGHT: f32 = 0.45;

/// World-to-pixel mapping for one frame size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixels per world unit
    pub fn scale(&self) -> f32 {
        self.height as f32 / FRAME_HEIGHT
    }

    /// Multiplier for constants tuned at [`REFERENCE_HEIGHT`]
    pub fn px(&self, reference_px: f32) -> f32 {
        reference_px * self.height as f32 / REFERENCE_HEIGHT
    }

    /// Convert a world point to pixel coordinates (y down)
    pub fn to_px(&self, p: Vec2) -> (f32, f32) {
        let s = self.scale();
        (
            self.width as f32 * 0.5 + p.x * s,
            self.height as f32 * 0.5 - p.y * s,
        )
    }
}
