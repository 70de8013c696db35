use assert_cmd::Command;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("imgbucket");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env_remove("RUST_LOG");
    (command, temp_home)
}

#[allow(dead_code)]
pub fn write_settings(home: &Path, contents: &str) {
    let config_dir = home.join(".config").join("imgbucket");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(config_dir.join("config.toml"), contents).expect("write settings");
}

#[allow(dead_code)]
pub fn write_png(dir: &Path, name: &str) {
    fs::create_dir_all(dir).expect("create image dir");
    RgbImage::from_pixel(4, 3, Rgb([10, 200, 30]))
        .save_with_format(dir.join(name), image::ImageFormat::Png)
        .expect("write png");
}

#[allow(dead_code)]
pub fn assert_timestamp_log_names(entries: &[std::fs::DirEntry]) {
    assert!(!entries.is_empty(), "expected at least one diagnostics log");

    for entry in entries {
        let name = entry
            .file_name()
            .into_string()
            .expect("diagnostics filename utf8");
        let stem = name
            .strip_suffix(".log")
            .expect("diagnostics filename .log suffix");
        assert!(
            !stem.is_empty() && stem.chars().all(|character| character.is_ascii_digit()),
            "diagnostics filename must be <timestamp>.log, got: {name}"
        );
    }
}
