use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imgbucket_core::preview::scale_to_fit;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

const UPPER_HALF_BLOCK: &str = "\u{2580}";
/// Longest edge kept in memory for per-frame resampling.
const SAMPLE_EDGE: u32 = 512;

/// A decoded image ready to be drawn with half-block cells.
#[derive(Debug, Clone)]
pub(crate) struct PreviewImage {
    native: (u32, u32),
    scaled: (u32, u32),
    pixels: RgbImage,
}

impl PreviewImage {
    pub(crate) fn load(path: &Path, max_width: u32, max_height: u32) -> Result<Self> {
        let decoded = image::open(path)
            .with_context(|| format!("failed to decode {}", path.display()))?;
        Ok(Self::from_rgb(decoded.to_rgb8(), max_width, max_height))
    }

    pub(crate) fn from_rgb(pixels: RgbImage, max_width: u32, max_height: u32) -> Self {
        let native = pixels.dimensions();
        let scaled = scale_to_fit(native.0, native.1, max_width, max_height);
        let (sample_width, sample_height) = scale_to_fit(scaled.0, scaled.1, SAMPLE_EDGE, SAMPLE_EDGE);
        let pixels = if (sample_width, sample_height) == native {
            pixels
        } else {
            imageops::resize(&pixels, sample_width, sample_height, FilterType::Triangle)
        };

        Self {
            native,
            scaled,
            pixels,
        }
    }

    pub(crate) fn native(&self) -> (u32, u32) {
        self.native
    }

    /// Size after fitting into the configured preview box.
    pub(crate) fn scaled(&self) -> (u32, u32) {
        self.scaled
    }
}

impl Widget for &PreviewImage {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let (width, height) = self.pixels.dimensions();
        let (target_width, target_height) = scale_to_fit(
            width,
            height,
            u32::from(area.width),
            u32::from(area.height) * 2,
        );
        if target_width == 0 || target_height == 0 {
            return;
        }

        let resized;
        let frame = if (target_width, target_height) == (width, height) {
            &self.pixels
        } else {
            resized = imageops::resize(&self.pixels, target_width, target_height, FilterType::Triangle);
            &resized
        };
        let columns = target_width as u16;
        let rows = target_height.div_ceil(2) as u16;
        let origin_x = area.x + area.width.saturating_sub(columns) / 2;
        let origin_y = area.y + area.height.saturating_sub(rows) / 2;

        for row in 0..rows {
            let top_y = u32::from(row) * 2;
            let bottom_y = top_y + 1;
            for column in 0..columns {
                let Some(cell) = buf.cell_mut((origin_x + column, origin_y + row)) else {
                    continue;
                };

                let x = u32::from(column);
                let bottom = if bottom_y < target_height {
                    rgb(frame.get_pixel(x, bottom_y))
                } else {
                    Color::Reset
                };
                cell.set_symbol(UPPER_HALF_BLOCK)
                    .set_fg(rgb(frame.get_pixel(x, top_y)))
                    .set_bg(bottom);
            }
        }
    }
}

fn rgb(pixel: &Rgb<u8>) -> Color {
    let [red, green, blue] = pixel.0;
    Color::Rgb(red, green, blue)
}
