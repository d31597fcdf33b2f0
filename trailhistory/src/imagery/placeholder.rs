//! Placeholder images for failed downloads.
//!
//! When a POI's image cannot be fetched we substitute a dark panel with a red
//! frame and draw the failure text onto it with an 8x8 bitmap font, so any
//! surface showing just the bitmap still tells the user what went wrong. The
//! same text is kept in [`PoiImage::Placeholder`](crate::poi::PoiImage).
//!
//! # Static Placeholder
//!
//! A text-free panel with a red cross is generated at first access and cached
//! for the lifetime of the process. It is only used when the text panel
//! cannot be drawn.

use std::sync::{Arc, OnceLock};

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use thiserror::Error;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

/// Default placeholder width in pixels (matches the card image slot).
pub const DEFAULT_PLACEHOLDER_WIDTH: u32 = 400;

/// Default placeholder height in pixels.
pub const DEFAULT_PLACEHOLDER_HEIGHT: u32 = 100;

const BACKGROUND: [u8; 4] = [48, 48, 48, 255];
const INDICATOR: [u8; 4] = [220, 30, 30, 255];
const TEXT: [u8; 4] = [235, 235, 235, 255];

/// Glyph cell edge in pixels.
const GLYPH: u32 = 8;
/// Baseline-to-baseline distance in pixels.
const LINE_HEIGHT: u32 = 10;
/// Space between the frame and the text, in pixels.
const TEXT_PADDING: u32 = 3;

static DEFAULT_PLACEHOLDER: OnceLock<Arc<RgbaImage>> = OnceLock::new();

/// Errors from placeholder generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaceholderError {
    #[error("invalid placeholder size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("failed to build placeholder geometry")]
    Geometry,
}

/// Generate a placeholder bitmap of the given size.
///
/// # Errors
///
/// Returns [`PlaceholderError::InvalidSize`] for zero dimensions.
///
/// # Examples
///
/// ```
/// use trailhistory::imagery::generate_placeholder;
///
/// let bitmap = generate_placeholder(64, 16).unwrap();
/// assert_eq!(bitmap.dimensions(), (64, 16));
/// ```
pub fn generate_placeholder(width: u32, height: u32) -> Result<RgbaImage, PlaceholderError> {
    draw_panel(width, height, true)
}

/// Generate a placeholder bitmap with `message` written on it.
///
/// The text is word-wrapped to the panel width; lines that do not fit the
/// height are dropped. Blank lines in `message` are skipped.
///
/// # Errors
///
/// Returns [`PlaceholderError::InvalidSize`] for zero dimensions.
pub fn render_placeholder(width: u32, height: u32, message: &str) -> Result<RgbaImage, PlaceholderError> {
    let mut bitmap = draw_panel(width, height, false)?;

    let inset = frame_width(width, height).ceil() as u32 + TEXT_PADDING;
    let columns = width.saturating_sub(2 * inset) / GLYPH;
    let rows = (height.saturating_sub(2 * inset) + LINE_HEIGHT - GLYPH) / LINE_HEIGHT;

    for (row, line) in wrap_text(message, columns as usize).iter().take(rows as usize).enumerate() {
        let y = inset + row as u32 * LINE_HEIGHT;
        for (column, c) in line.chars().enumerate() {
            draw_glyph(&mut bitmap, c, inset + column as u32 * GLYPH, y);
        }
    }

    Ok(bitmap)
}

fn frame_width(width: u32, height: u32) -> f32 {
    (width.min(height) as f32 / 16.0).max(1.0)
}

fn draw_panel(width: u32, height: u32, cross: bool) -> Result<RgbaImage, PlaceholderError> {
    let invalid = PlaceholderError::InvalidSize { width, height };
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| invalid.clone())?;

    pixmap.fill(Color::from_rgba8(
        BACKGROUND[0],
        BACKGROUND[1],
        BACKGROUND[2],
        BACKGROUND[3],
    ));

    let mut paint = Paint::default();
    paint.set_color_rgba8(INDICATOR[0], INDICATOR[1], INDICATOR[2], INDICATOR[3]);
    paint.anti_alias = true;

    let line = frame_width(width, height);
    let stroke = Stroke {
        width: line,
        ..Stroke::default()
    };

    // Frame, inset by half a line so the stroke stays inside the bitmap.
    let half = line / 2.0;
    let frame = Rect::from_xywh(half, half, width as f32 - line, height as f32 - line)
        .map(PathBuilder::from_rect);
    if let Some(frame) = frame {
        pixmap.stroke_path(&frame, &paint, &stroke, Transform::identity(), None);
    }

    if cross {
        draw_cross(&mut pixmap, &paint, &stroke, width, height)?;
    }

    // The background is opaque, so premultiplied and straight alpha agree.
    RgbaImage::from_raw(width, height, pixmap.take()).ok_or(invalid)
}

/// A cross centred in a square so it reads the same on wide cards.
fn draw_cross(
    pixmap: &mut Pixmap,
    paint: &Paint,
    stroke: &Stroke,
    width: u32,
    height: u32,
) -> Result<(), PlaceholderError> {
    let side = width.min(height) as f32 * 0.6;
    let left = (width as f32 - side) / 2.0;
    let top = (height as f32 - side) / 2.0;
    let mut builder = PathBuilder::new();
    builder.move_to(left, top);
    builder.line_to(left + side, top + side);
    builder.move_to(left + side, top);
    builder.line_to(left, top + side);
    let cross = builder.finish().ok_or(PlaceholderError::Geometry)?;
    pixmap.stroke_path(&cross, paint, stroke, Transform::identity(), None);
    Ok(())
}

/// Greedy word wrap to `columns` characters. Words longer than a line are
/// split.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if columns == 0 {
        return lines;
    }

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            let used = line.chars().count();
            if used > 0 && used + 1 + word.len() <= columns {
                line.push(' ');
                line.extend(word.iter());
                continue;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut line));
            }
            while word.len() > columns {
                let rest = word.split_off(columns);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            line.extend(word.iter());
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}

/// Draw one character with its top-left corner at (x, y), clipped to the
/// bitmap. Characters the font lacks are drawn as `?`.
fn draw_glyph(bitmap: &mut RgbaImage, c: char, x: u32, y: u32) {
    let Some(glyph) = BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
    else {
        return;
    };

    // Bit n of each row byte is column n.
    for (dy, bits) in glyph.iter().enumerate() {
        for dx in 0..GLYPH {
            if bits & (1 << dx) == 0 {
                continue;
            }
            let (px, py) = (x + dx, y + dy as u32);
            if px < bitmap.width() && py < bitmap.height() {
                bitmap.put_pixel(px, py, Rgba(TEXT));
            }
        }
    }
}

/// Get the default-size placeholder, generated once and shared.
///
/// Never fails: should drawing ever fail, a solid panel of the background
/// color is used instead.
pub fn default_placeholder() -> Arc<RgbaImage> {
    DEFAULT_PLACEHOLDER
        .get_or_init(|| {
            let bitmap = generate_placeholder(DEFAULT_PLACEHOLDER_WIDTH, DEFAULT_PLACEHOLDER_HEIGHT)
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Placeholder drawing failed - using solid panel");
                    RgbaImage::from_pixel(
                        DEFAULT_PLACEHOLDER_WIDTH,
                        DEFAULT_PLACEHOLDER_HEIGHT,
                        Rgba(BACKGROUND),
                    )
                });
            Arc::new(bitmap)
        })
        .clone()
}

/// Placeholder bitmap for a configured size, sharing the cached default.
pub(crate) fn placeholder_for_size(width: u32, height: u32) -> Arc<RgbaImage> {
    if (width, height) == (DEFAULT_PLACEHOLDER_WIDTH, DEFAULT_PLACEHOLDER_HEIGHT) {
        return default_placeholder();
    }
    match generate_placeholder(width, height) {
        Ok(bitmap) => Arc::new(bitmap),
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to default placeholder size");
            default_placeholder()
        }
    }
}

/// Compose the text carried by a placeholder.
///
/// # Examples
///
/// ```
/// use trailhistory::imagery::placeholder_message;
///
/// let text = placeholder_message("Old Mill", "https://x.test/mill.jpg", "http response code = 404");
/// assert!(text.starts_with("Old Mill's image could not be downloaded"));
/// assert!(text.contains("Image Error: http response code = 404"));
/// ```
pub fn placeholder_message(name: &str, url: &str, detail: &str) -> String {
    format!(
        "{}'s image could not be downloaded\n\n[image url: {}]\n[details: Image Error: {}]",
        name, url, detail
    )
}
