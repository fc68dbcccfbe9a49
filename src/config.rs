//! Render configuration loaded from disk

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Color;

/// Settings for the raster engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// Frames rendered per time unit
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Frame background color
    #[serde(default = "default_background")]
    pub background: Color,
    /// TrueType/OpenType font used for labels (None = placeholder bars)
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    /// Whether to write `timeline.json` next to the frames
    #[serde(default = "default_write_manifest")]
    pub write_manifest: bool,
    /// Seed for decorative randomness (None = fresh entropy every run)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_fps() -> u32 {
    30
}

fn default_background() -> Color {
    Color::BLACK
}

fn default_write_manifest() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            background: default_background(),
            font_path: None,
            write_manifest: default_write_manifest(),
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Directory name under the user config dir
    pub const APP_DIR: &'static str = "noether";
    pub const FILE_NAME: &'static str = "config.json";

    /// Default config location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from `path`, or the default location
    ///
    /// A missing default file is silent; an unreadable or invalid file is
    /// logged and replaced by defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Self::default();
        };

        if !explicit && !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::debug!("Loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("Error parsing {}, using defaults: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read {}, using defaults: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Fresh timestamped output directory under the user's Videos folder
    pub fn default_output_dir() -> Option<PathBuf> {
        let mut path = dirs::video_dir().or_else(|| dirs::home_dir().map(|h| h.join("Videos")))?;
        let name = chrono::Local::now()
            .format("Noether_%Y-%m-%d_%H-%M-%S")
            .to_string();
        path.push(name);
        Some(path)
    }
}
