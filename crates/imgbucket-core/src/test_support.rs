use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 40 % 256) as u8, (y * 40 % 256) as u8, 128])
    });
    image
        .save_with_format(&path, ImageFormat::Png)
        .expect("write png fixture");
    path
}
