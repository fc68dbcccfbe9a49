//! Color palette used by the narration

use serde::{Deserialize, Serialize};

/// Serializable RGB color, components in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb8(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb8(0x00, 0x00, 0x00);
    pub const RED: Color = Color::rgb8(0xFC, 0x62, 0x55);
    pub const YELLOW: Color = Color::rgb8(0xFF, 0xFF, 0x00);
    pub const GREEN: Color = Color::rgb8(0x83, 0xC1, 0x67);
    pub const BLUE: Color = Color::rgb8(0x58, 0xC4, 0xDD);

    /// Build from 8-bit channel values
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Convert to RGBA bytes (0-255) with the given opacity
    pub fn to_rgba_u8(self, opacity: f32) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}
