//! Visual object types drawn by the narration
//!
//! All object geometry is stored in absolute world coordinates, so
//! transforms (shift, rotate, scale) are applied to the stored points and
//! engines never need a parent transform chain.

use serde::Serialize;

use super::color::Color;
use super::geometry::{Bounds, Vec2, ORIGIN};
use super::layout::Layout;

/// World units per point of font size for one text line
pub const LINE_HEIGHT_PER_PT: f32 = 0.0125;
/// Average glyph advance relative to line height
pub const GLYPH_ASPECT: f32 = 0.5;
/// Default dot radius
pub const DOT_RADIUS: f32 = 0.08;
/// Tick half-height on number lines
pub const TICK_SIZE: f32 = 0.1;

/// How a text label's content should be interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Markup {
    /// Plain text, drawn as-is
    Plain,
    /// TeX source with inline `$...$` math
    Tex,
}

/// Drawable geometry of a visual object
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Shape {
    Text {
        content: String,
        markup: Markup,
        font_size: f32,
        center: Vec2,
        /// Multiplier applied by scale transforms
        scale: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill_opacity: f32,
    },
    Dot {
        center: Vec2,
        radius: f32,
    },
    Line {
        start: Vec2,
        end: Vec2,
    },
    Arrow {
        start: Vec2,
        end: Vec2,
    },
    NumberLine {
        start: Vec2,
        end: Vec2,
        x_min: f32,
        x_max: f32,
        step: f32,
    },
}

/// Any drawable entity handed to an engine
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisualObject {
    pub shape: Shape,
    pub color: Color,
}

impl VisualObject {
    /// Plain text label centred at the origin
    pub fn text(content: impl Into<String>, font_size: f32, color: Color) -> Self {
        Self::label(content.into(), Markup::Plain, font_size, color)
    }

    /// TeX label centred at the origin
    pub fn tex(content: impl Into<String>, font_size: f32, color: Color) -> Self {
        Self::label(content.into(), Markup::Tex, font_size, color)
    }

    fn label(content: String, markup: Markup, font_size: f32, color: Color) -> Self {
        Self {
            shape: Shape::Text {
                content,
                markup,
                font_size,
                center: ORIGIN,
                scale: 1.0,
            },
            color,
        }
    }

    pub fn circle(radius: f32, color: Color) -> Self {
        Self {
            shape: Shape::Circle {
                center: ORIGIN,
                radius,
                fill_opacity: 0.0,
            },
            color,
        }
    }

    /// Set the fill opacity of a circle; other shapes are unaffected
    pub fn with_fill(mut self, opacity: f32) -> Self {
        if let Shape::Circle { fill_opacity, .. } = &mut self.shape {
            *fill_opacity = opacity;
        }
        self
    }

    pub fn dot(center: Vec2, color: Color) -> Self {
        Self {
            shape: Shape::Dot {
                center,
                radius: DOT_RADIUS,
            },
            color,
        }
    }

    pub fn line(start: Vec2, end: Vec2, color: Color) -> Self {
        Self {
            shape: Shape::Line { start, end },
            color,
        }
    }

    pub fn arrow(start: Vec2, end: Vec2, color: Color) -> Self {
        Self {
            shape: Shape::Arrow { start, end },
            color,
        }
    }

    /// Horizontal number line covering `[x_min, x_max]`, centred at the origin
    pub fn number_line(x_min: f32, x_max: f32, step: f32, length: f32) -> Self {
        Self {
            shape: Shape::NumberLine {
                start: Vec2::new(-length * 0.5, 0.0),
                end: Vec2::new(length * 0.5, 0.0),
                x_min,
                x_max,
                step,
            },
            color: Color::WHITE,
        }
    }

    /// World position of value `x` on a number line
    ///
    /// Returns the object's centre for any other shape.
    pub fn number_to_point(&self, x: f32) -> Vec2 {
        match &self.shape {
            Shape::NumberLine {
                start,
                end,
                x_min,
                x_max,
                ..
            } => {
                let span = x_max - x_min;
                let t = if span == 0.0 { 0.0 } else { (x - x_min) / span };
                start.lerp(*end, t)
            }
            _ => self.center(),
        }
    }

    /// Rotate counter-clockwise by `angle` radians around `about`
    pub fn rotate(&mut self, angle: f32, about: Vec2) {
        match &mut self.shape {
            Shape::Text { center, .. } | Shape::Circle { center, .. } | Shape::Dot { center, .. } => {
                *center = center.rotate_about(angle, about);
            }
            Shape::Line { start, end }
            | Shape::Arrow { start, end }
            | Shape::NumberLine { start, end, .. } => {
                *start = start.rotate_about(angle, about);
                *end = end.rotate_about(angle, about);
            }
        }
    }

    /// Scale geometry by `factor` around `about`
    pub fn scale(&mut self, factor: f32, about: Vec2) {
        match &mut self.shape {
            Shape::Text { center, scale, .. } => {
                *center = center.scale_about(factor, about);
                *scale *= factor;
            }
            Shape::Circle { center, radius, .. } | Shape::Dot { center, radius } => {
                *center = center.scale_about(factor, about);
                *radius *= factor;
            }
            Shape::Line { start, end }
            | Shape::Arrow { start, end }
            | Shape::NumberLine { start, end, .. } => {
                *start = start.scale_about(factor, about);
                *end = end.scale_about(factor, about);
            }
        }
    }
}

impl Layout for VisualObject {
    fn bounds(&self) -> Bounds {
        match &self.shape {
            Shape::Text {
                content,
                markup,
                font_size,
                center,
                scale,
            } => {
                let (width, height) = text_extent(content, *markup, *font_size * scale);
                Bounds::centered(*center, width, height)
            }
            Shape::Circle { center, radius, .. } | Shape::Dot { center, radius } => {
                Bounds::centered(*center, radius * 2.0, radius * 2.0)
            }
            Shape::Line { start, end } | Shape::Arrow { start, end } => {
                Bounds::from_corners(*start, *end)
            }
            Shape::NumberLine { start, end, .. } => {
                let tick = Vec2::new(0.0, TICK_SIZE);
                Bounds::from_corners(*start - tick, *end + tick)
            }
        }
    }

    fn translate(&mut self, offset: Vec2) {
        match &mut self.shape {
            Shape::Text { center, .. } | Shape::Circle { center, .. } | Shape::Dot { center, .. } => {
                *center += offset;
            }
            Shape::Line { start, end }
            | Shape::Arrow { start, end }
            | Shape::NumberLine { start, end, .. } => {
                *start += offset;
                *end += offset;
            }
        }
    }
}

/// Estimated (width, height) of a single-line label in world units
pub fn text_extent(content: &str, markup: Markup, font_size: f32) -> (f32, f32) {
    let height = font_size * LINE_HEIGHT_PER_PT;
    let glyphs = display_text(content, markup).chars().count() as f32;
    (glyphs * height * GLYPH_ASPECT, height)
}

/// Text as it should appear on screen
///
/// TeX math delimiters are dropped and common control sequences are
/// replaced by their Unicode symbol. Unknown control sequences are dropped.
pub fn display_text(content: &str, markup: Markup) -> String {
    if markup == Markup::Plain {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' | '{' | '}' => {}
            '\\' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphabetic() {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    // `\,` and friends are spacing
                    if chars.next_if(|n| matches!(n, ',' | ';' | ' ')).is_some() {
                        out.push(' ');
                    }
                    continue;
                }
                if let Some(symbol) = tex_symbol(&name) {
                    out.push_str(symbol);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn tex_symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "rightarrow" | "to" => "→",
        "int" => "∫",
        "partial" => "∂",
        "epsilon" => "ε",
        "delta" => "δ",
        "dot" => "˙",
        "frac" => "",
        "left" | "right" => "",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::DOWN;
    use std::f32::consts::PI;

    #[test]
    fn test_display_text_strips_tex() {
        assert_eq!(
            display_text("Time Symmetry $\\rightarrow$ Energy Conservation", Markup::Tex),
            "Time Symmetry → Energy Conservation"
        );
        assert_eq!(
            display_text(r"leaves $S$ invariant: $\delta S = 0$.", Markup::Tex),
            "leaves S invariant: δ S = 0."
        );
        assert_eq!(display_text("$x$", Markup::Plain), "$x$");
    }

    #[test]
    fn test_number_to_point() {
        let line = VisualObject::number_line(-4.0, 4.0, 1.0, 8.0).shifted(DOWN);
        assert_eq!(line.number_to_point(-2.0), Vec2::new(-2.0, -1.0));
        assert_eq!(line.number_to_point(4.0), Vec2::new(4.0, -1.0));
    }

    #[test]
    fn test_rotate_moves_rim_marker_back_after_full_turn() {
        let mut dot = VisualObject::dot(Vec2::new(-1.5, 0.0), Color::RED);
        dot.rotate(PI, Vec2::new(-3.0, 0.0));
        assert!((dot.center() - Vec2::new(-4.5, 0.0)).length() < 1e-4);
        dot.rotate(PI, Vec2::new(-3.0, 0.0));
        assert!((dot.center() - Vec2::new(-1.5, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_scale_arrow_about_tail() {
        let mut arrow = VisualObject::arrow(Vec2::new(1.0, 0.0), Vec2::new(1.5, 0.0), Color::YELLOW);
        arrow.scale(1.2, Vec2::new(1.0, 0.0));
        match arrow.shape {
            Shape::Arrow { start, end } => {
                assert_eq!(start, Vec2::new(1.0, 0.0));
                assert!((end.x - 1.6).abs() < 1e-5);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_text_bounds_grow_with_font_size() {
        let small = VisualObject::text("Particle", 24.0, Color::WHITE).bounds();
        let large = VisualObject::text("Particle", 48.0, Color::WHITE).bounds();
        assert!((large.width() - small.width() * 2.0).abs() < 1e-5);
        assert_eq!(small.center(), ORIGIN);
    }
}
