//! Demo settings loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable settings files.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::rasterizer::Color4;

/// Error type for settings and frame I/O
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Everything the animated flower scene and its window need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub window_width: usize,
    pub window_height: usize,
    /// Triangles per flower
    pub petals: usize,
    /// Flower radius in local units
    pub radius: f32,
    /// Arms radiating from the central flower
    pub arms: usize,
    /// Flowers along each arm
    pub flowers_per_arm: usize,
    /// Scale applied per flower step (inverted for the last third of an arm)
    pub step_scale: f32,
    /// Translation per flower step
    pub arm_offset: f32,
    /// Scale applied to the whole scene
    pub scene_scale: f32,
    pub frames_per_second: u32,
    /// Where the `S` key writes the current frame
    pub output_path: PathBuf,
    pub background: Color4,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            window_width: 512,
            window_height: 512,
            petals: 20,
            radius: 50.0,
            arms: 4,
            flowers_per_arm: 21,
            step_scale: 0.8,
            arm_offset: 75.0,
            scene_scale: 0.5,
            frames_per_second: 30,
            output_path: PathBuf::from("output.png"),
            background: Color4::BLACK,
        }
    }
}

/// Load settings from a RON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<DemoSettings, SettingsError> {
    let contents = fs::read_to_string(path)?;
    load_settings_from_str(&contents)
}

/// Load settings from a RON string; missing fields take their defaults
pub fn load_settings_from_str(s: &str) -> Result<DemoSettings, SettingsError> {
    Ok(ron::from_str(s)?)
}

/// Save settings to a RON file
pub fn save_settings<P: AsRef<Path>>(settings: &DemoSettings, path: P) -> Result<(), SettingsError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(settings, config)?;
    fs::write(path, contents)?;
    Ok(())
}
