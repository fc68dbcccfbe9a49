//! Frame rasterization using tiny-skia
//!
//! These functions draw visual objects onto a Pixmap and convert the
//! finished frame into an RgbaImage for PNG encoding.

use std::io;

use image::RgbaImage;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry::{arrow, shape, Viewport, PLACEHOLDER_HEIGHT};
use super::text::TextRasterizer;
use crate::domain::{display_text, text_extent, Color, Markup, Shape, Vec2, VisualObject, TICK_SIZE};

/// Allocate a frame filled with `background`
pub fn new_frame(viewport: Viewport, background: Color) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(viewport.width, viewport.height)?;
    let [r, g, b, a] = background.to_rgba_u8(1.0);
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    Some(pixmap)
}

fn paint(color: Color, opacity: f32) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8(opacity);
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn stroke_path(pixmap: &mut Pixmap, path: &Path, color: Color, opacity: f32, width: f32) {
    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(path, &paint(color, opacity), &stroke, Transform::identity(), None);
}

fn fill_path(pixmap: &mut Pixmap, path: &Path, color: Color, opacity: f32) {
    pixmap.fill_path(
        path,
        &paint(color, opacity),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<Path> {
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();
    pb.move_to(cx, cy - ry);
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
    pb.close();
    pb.finish()
}

/// Build the first `progress` of a circle outline, starting at its rightmost point
fn build_arc_path(cx: f32, cy: f32, r: f32, progress: f32) -> Option<Path> {
    let segments = ((shape::ARC_SEGMENTS as f32 * progress).ceil() as usize).max(1);
    let sweep = std::f32::consts::TAU * progress;

    let mut pb = PathBuilder::new();
    pb.move_to(cx + r, cy);
    for i in 1..=segments {
        let angle = sweep * i as f32 / segments as f32;
        // Counter-clockwise on screen means negative y in pixel space
        pb.line_to(cx + r * angle.cos(), cy - r * angle.sin());
    }
    pb.finish()
}

/// Build an arrow path as stroked lines (shaft + two angled head lines)
fn build_arrow_path(start: (f32, f32), end: (f32, f32), head_size: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(start.0, start.1);
    pb.line_to(end.0, end.1);

    if let Some((head1_x, head1_y, head2_x, head2_y)) =
        arrow::head_points(start.0, start.1, end.0, end.1, head_size)
    {
        pb.move_to(end.0, end.1);
        pb.line_to(head1_x, head1_y);
        pb.move_to(end.0, end.1);
        pb.line_to(head2_x, head2_y);
    }
    pb.finish()
}

fn build_line_path(start: (f32, f32), end: (f32, f32)) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(start.0, start.1);
    pb.line_to(end.0, end.1);
    pb.finish()
}

/// Draw one object at the given opacity and entrance progress
///
/// `progress` below 1.0 draws a partially revealed object: outlines are
/// traced from their start point, labels show a prefix of their characters.
pub fn draw_object(
    pixmap: &mut Pixmap,
    viewport: Viewport,
    object: &VisualObject,
    opacity: f32,
    progress: f32,
    font: Option<&TextRasterizer>,
) {
    if opacity <= 0.0 || progress <= 0.0 {
        return;
    }
    let progress = progress.min(1.0);
    let color = object.color;
    let thickness = viewport.px(shape::THICKNESS);

    match &object.shape {
        Shape::Text {
            content,
            markup,
            font_size,
            center,
            scale,
        } => {
            let text = display_text(content, *markup);
            let total = text.chars().count();
            let shown = ((total as f32 * progress).ceil() as usize).min(total);
            let visible: String = text.chars().take(shown).collect();
            let size = font_size * scale;
            draw_label(pixmap, viewport, &visible, &text, size, *center, color, opacity, font);
        }
        Shape::Circle {
            center,
            radius,
            fill_opacity,
        } => {
            let (cx, cy) = viewport.to_px(*center);
            let r = radius * viewport.scale();
            let path = if progress >= 1.0 {
                build_ellipse_path(cx, cy, r, r)
            } else {
                build_arc_path(cx, cy, r, progress)
            };
            let Some(path) = path else {
                return;
            };
            if *fill_opacity > 0.0 {
                if let Some(disc) = build_ellipse_path(cx, cy, r, r) {
                    fill_path(pixmap, &disc, color, fill_opacity * opacity * progress);
                }
            }
            stroke_path(pixmap, &path, color, opacity, thickness);
        }
        Shape::Dot { center, radius } => {
            let (cx, cy) = viewport.to_px(*center);
            let r = (radius * viewport.scale()).max(1.0);
            if let Some(path) = build_ellipse_path(cx, cy, r, r) {
                fill_path(pixmap, &path, color, opacity * progress);
            }
        }
        Shape::Line { start, end } => {
            let tip = start.lerp(*end, progress);
            if let Some(path) = build_line_path(viewport.to_px(*start), viewport.to_px(tip)) {
                stroke_path(pixmap, &path, color, opacity, thickness);
            }
        }
        Shape::Arrow { start, end } => {
            let tip = start.lerp(*end, progress);
            let head = viewport.px(arrow::HEAD_SIZE);
            if let Some(path) = build_arrow_path(viewport.to_px(*start), viewport.to_px(tip), head) {
                stroke_path(pixmap, &path, color, opacity, viewport.px(arrow::THICKNESS));
            }
        }
        Shape::NumberLine { start, end, .. } => {
            let tip = start.lerp(*end, progress);
            if let Some(path) = build_line_path(viewport.to_px(*start), viewport.to_px(tip)) {
                stroke_path(pixmap, &path, color, opacity, thickness);
            }
            draw_ticks(pixmap, viewport, object, progress, opacity);
        }
    }
}

/// Ticks perpendicular to the line at every `step`, up to the drawn fraction
fn draw_ticks(
    pixmap: &mut Pixmap,
    viewport: Viewport,
    object: &VisualObject,
    progress: f32,
    opacity: f32,
) {
    let Shape::NumberLine {
        start,
        end,
        x_min,
        x_max,
        step,
    } = object.shape
    else {
        return;
    };
    if step <= 0.0 || x_max <= x_min {
        return;
    }
    let along = end - start;
    let length = along.length();
    if length == 0.0 {
        return;
    }
    let normal = Vec2::new(-along.y / length, along.x / length) * TICK_SIZE;
    let count = ((x_max - x_min) / step).round() as usize;

    let mut pb = PathBuilder::new();
    for i in 0..=count {
        let x = x_min + step * i as f32;
        if (x - x_min) / (x_max - x_min) > progress {
            break;
        }
        let p = object.number_to_point(x);
        let (ax, ay) = viewport.to_px(p + normal);
        let (bx, by) = viewport.to_px(p - normal);
        pb.move_to(ax, ay);
        pb.line_to(bx, by);
    }
    if let Some(path) = pb.finish() {
        stroke_path(pixmap, &path, object.color, opacity, viewport.px(shape::TICK_THICKNESS));
    }
}

/// Draw a label with the font, or a placeholder bar when no font is loaded
///
/// `full` is the complete display text; the placeholder is sized from it so
/// a partially written label grows from the left edge of its final extent.
#[allow(clippy::too_many_arguments)]
fn draw_label(
    pixmap: &mut Pixmap,
    viewport: Viewport,
    visible: &str,
    full: &str,
    font_size: f32,
    center: Vec2,
    color: Color,
    opacity: f32,
    font: Option<&TextRasterizer>,
) {
    if visible.is_empty() {
        return;
    }
    let (world_w, world_h) = text_extent(full, Markup::Plain, font_size);
    let px_size = world_h * viewport.scale();

    match font {
        Some(font) => {
            // Keep the left edge fixed while the label is written in
            let full_w = font.measure(full, px_size);
            let visible_w = font.measure(visible, px_size);
            let (cx, cy) = viewport.to_px(center);
            let left = cx - full_w * 0.5;
            font.draw(pixmap, visible, (left + visible_w * 0.5, cy), px_size, color, opacity);
        }
        None => {
            let fraction = visible.chars().count() as f32 / full.chars().count().max(1) as f32;
            let (cx, cy) = viewport.to_px(center);
            let w = world_w * viewport.scale();
            let h = px_size * PLACEHOLDER_HEIGHT;
            if let Some(rect) = tiny_skia::Rect::from_xywh(cx - w * 0.5, cy - h * 0.5, w * fraction, h) {
                pixmap.fill_rect(rect, &paint(color, opacity * 0.6), Transform::identity(), None);
            }
        }
    }
}

/// Convert a premultiplied frame into a straight-alpha image
pub fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
