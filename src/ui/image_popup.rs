//! Full-color image drawing with upper-half-block cells.
//!
//! Each terminal cell shows two vertically stacked pixels: the glyph `▀`
//! takes the upper pixel as foreground and the lower one as background.

use image::imageops::FilterType;
use image::DynamicImage;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

const UPPER_HALF_BLOCK: &str = "▀";

/// Largest size with the same aspect ratio as `width`×`height` that fits in
/// `max_width`×`max_height`. Never collapses below one pixel per side.
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
        return (0, 0);
    }
    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let fitted_width = ((width as f64 * scale).floor() as u32).clamp(1, max_width);
    let fitted_height = ((height as f64 * scale).floor() as u32).clamp(1, max_height);
    (fitted_width, fitted_height)
}

pub struct HalfBlockImage<'a> {
    image: &'a DynamicImage,
}

impl<'a> HalfBlockImage<'a> {
    pub fn new(image: &'a DynamicImage) -> Self {
        Self { image }
    }
}

impl Widget for HalfBlockImage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (columns, pixel_rows) = fit_dimensions(
            self.image.width(),
            self.image.height(),
            area.width as u32,
            area.height as u32 * 2,
        );
        if columns == 0 || pixel_rows == 0 {
            return;
        }

        let pixels = self
            .image
            .resize_exact(columns, pixel_rows, FilterType::Triangle)
            .to_rgb8();
        let cell_rows = pixel_rows.div_ceil(2);
        let x0 = area.x + (area.width - columns as u16) / 2;
        let y0 = area.y + (area.height - cell_rows as u16) / 2;

        for row in 0..cell_rows {
            for col in 0..columns {
                let upper = pixels.get_pixel(col, row * 2).0;
                let lower = if row * 2 + 1 < pixel_rows {
                    pixels.get_pixel(col, row * 2 + 1).0
                } else {
                    [0, 0, 0]
                };
                if let Some(cell) = buf.cell_mut((x0 + col as u16, y0 + row as u16)) {
                    cell.set_symbol(UPPER_HALF_BLOCK)
                        .set_fg(Color::Rgb(upper[0], upper[1], upper[2]))
                        .set_bg(Color::Rgb(lower[0], lower[1], lower[2]));
                }
            }
        }
    }
}
