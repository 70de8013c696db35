use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{ImageFormat, Rgb, RgbImage};
use imgbucket_core::config::BUCKET_FILE_NAME;

pub static ENV_LOCK: Mutex<()> = Mutex::new(());

fn fixture(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 17 % 256) as u8, (y * 29 % 256) as u8, 200])
    })
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    fixture(width, height)
        .save_with_format(&path, ImageFormat::Png)
        .expect("write png fixture");
    path
}

#[allow(dead_code)]
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    fixture(width, height)
        .save_with_format(&path, ImageFormat::Jpeg)
        .expect("write jpeg fixture");
    path
}

#[allow(dead_code)]
pub fn write_bucket_file(dir: &Path, contents: &str) {
    fs::write(dir.join(BUCKET_FILE_NAME), contents).expect("write bucket file");
}

#[allow(dead_code)]
pub fn write_settings(home: &Path, contents: &str) {
    let config_dir = home.join(".config").join("imgbucket");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(config_dir.join("config.toml"), contents).expect("write settings");
}
