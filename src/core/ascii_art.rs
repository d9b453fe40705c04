//! Brightness-mapped character art for inline image display.

use image::imageops::{self, FilterType};
use image::DynamicImage;

pub const DEFAULT_COLUMNS: u32 = 80;

/// Terminal cells are roughly twice as tall as they are wide.
pub const ASPECT_COMPENSATION: f64 = 0.55;

/// Darkest to lightest.
pub const GLYPH_RAMP: &[u8] = b"@%#*+=-:. ";

pub fn glyph_for(level: u8) -> char {
    let index = level as usize * GLYPH_RAMP.len() / 256;
    GLYPH_RAMP[index] as char
}

/// Render `image` as `columns`-wide character art, one `\n` after each row.
pub fn render_ascii(image: &DynamicImage, columns: u32) -> String {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 || columns == 0 {
        return String::new();
    }

    let aspect_ratio = height as f64 / width as f64;
    let rows = ((aspect_ratio * columns as f64 * ASPECT_COMPENSATION) as u32).max(1);
    let resized = imageops::resize(&gray, columns, rows, FilterType::CatmullRom);

    let mut art = String::with_capacity(((columns + 1) * rows) as usize);
    for row in resized.rows() {
        art.extend(row.map(|pixel| glyph_for(pixel.0[0])));
        art.push('\n');
    }
    art
}
