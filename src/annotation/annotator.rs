/// Draw bounding boxes and class labels on a copy of the source image.
///
/// Each detection gets an outline rectangle and its class label drawn a few
/// pixels inside the top-left corner. The output keeps the source's size and
/// colour type, and anything falling outside the canvas is clipped.
use image::{DynamicImage, GenericImage, Rgba};

use crate::annotation::font::{glyph, GLYPH_SIZE};
use crate::config::AnnotationConfig;
use crate::detection::types::{Detection, PixelRect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationStyle {
    pub outline: Rgba<u8>,
    pub stroke_width: u32,
    pub label_offset: i64,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self::from(&AnnotationConfig::default())
    }
}

impl From<&AnnotationConfig> for AnnotationStyle {
    fn from(config: &AnnotationConfig) -> Self {
        let [r, g, b] = config.outline;
        Self {
            outline: Rgba([r, g, b, 255]),
            stroke_width: config.stroke_width,
            label_offset: config.label_offset,
        }
    }
}

/// Returns an annotated copy of `source`; `source` itself is left untouched.
///
/// Labels are drawn at 2× scale on images wider than 1600 px.
pub fn annotate(source: &DynamicImage, detections: &[Detection], style: &AnnotationStyle) -> DynamicImage {
    let mut canvas = source.clone();
    if detections.is_empty() {
        return canvas;
    }

    let label_scale: u32 = if canvas.width() > 1600 { 2 } else { 1 };

    for det in detections {
        let rect = det.pixel_rect();
        draw_rect(&mut canvas, rect, style.outline, style.stroke_width as i64);
        draw_text(
            &mut canvas,
            rect.left.saturating_add(style.label_offset),
            rect.top.saturating_add(style.label_offset),
            det.class_label(),
            style.outline,
            label_scale,
        );
    }

    tracing::debug!(
        count = detections.len(),
        width = canvas.width(),
        height = canvas.height(),
        "image annotated"
    );
    canvas
}

// ── Drawing primitives ──────────────────────────────────────────────────────

fn draw_rect(canvas: &mut DynamicImage, rect: PixelRect, col: Rgba<u8>, thickness: i64) {
    let (iw, ih) = (canvas.width() as i64, canvas.height() as i64);
    if iw == 0 || ih == 0 {
        return;
    }
    let (x1, y1, x2, y2) = (rect.left, rect.top, rect.right(), rect.bottom());
    let xs = x1.max(0)..=x2.min(iw - 1);
    let ys = y1.max(0)..=y2.min(ih - 1);

    for t in 0..thickness {
        // Top & bottom edges
        for y in [y1.saturating_add(t), y2.saturating_sub(t)] {
            if (0..ih).contains(&y) {
                for x in xs.clone() {
                    canvas.put_pixel(x as u32, y as u32, col);
                }
            }
        }
        // Left & right edges
        for x in [x1.saturating_add(t), x2.saturating_sub(t)] {
            if (0..iw).contains(&x) {
                for y in ys.clone() {
                    canvas.put_pixel(x as u32, y as u32, col);
                }
            }
        }
    }
}

fn draw_text(canvas: &mut DynamicImage, x: i64, y: i64, text: &str, col: Rgba<u8>, scale: u32) {
    let (iw, ih) = (canvas.width() as i64, canvas.height() as i64);
    let scale = scale as i64;
    let step = GLYPH_SIZE as i64 * scale + scale;

    for (i, c) in text.chars().enumerate() {
        let gx = x.saturating_add((i as i64).saturating_mul(step));
        if gx >= iw {
            break;
        }
        let Some(rows) = glyph(c) else { continue };
        for (row, &bits) in rows.iter().enumerate() {
            for bit in 0..GLYPH_SIZE {
                if (bits >> (GLYPH_SIZE - 1 - bit)) & 1 == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = gx.saturating_add(bit as i64 * scale + sx);
                        let py = y.saturating_add(row as i64 * scale + sy);
                        if (0..iw).contains(&px) && (0..ih).contains(&py) {
                            canvas.put_pixel(px as u32, py as u32, col);
                        }
                    }
                }
            }
        }
    }
}
