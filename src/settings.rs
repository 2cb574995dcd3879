//! User settings, read from `settings.json` in the platform config directory.
//!
//! Every key is optional. A missing file means default settings.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::camera::Projection;
use crate::scene::Variant;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    pub variant: Variant,
    /// Degrees of rotation per pixel of drag.
    pub sensitivity: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: [f32; 4],
    /// Directory holding `shader.vert` and `shader.frag`. Embedded shaders are used when unset.
    pub shader_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fullscreen: false,
            vsync: true,
            variant: Variant::Orbit,
            sensitivity: 0.1,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            shader_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub const FILE_NAME: &'static str = "settings.json";

    /// Where the settings file is looked up, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(Self::FILE_NAME))
    }

    pub fn from_json(s: &str) -> Result<Self, String> {
        let settings: Self = serde_json::from_str(s).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from `path`. Returns `Ok(None)` if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, String> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&contents)
            .map(Some)
            .map_err(|e| format!("Invalid settings in {}: {}", path.display(), e))
    }

    fn validate(&self) -> Result<(), String> {
        let floats = [
            ("sensitivity", self.sensitivity),
            ("fov", self.fov),
            ("near", self.near),
            ("far", self.far),
        ];
        let channels = self.clear_color.map(|channel| ("clear_color", channel));
        for (name, value) in floats.into_iter().chain(channels) {
            if !value.is_finite() {
                return Err(format!("{name} must be finite, got {value}"));
            }
        }
        if self.sensitivity <= 0.0 {
            return Err(format!("sensitivity must be positive, got {}", self.sensitivity));
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!("window size {}x{} is empty", self.width, self.height));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(format!("fov must be between 0 and 180 degrees, got {}", self.fov));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(format!(
                "clip planes must satisfy 0 < near < far, got near {} and far {}",
                self.near, self.far
            ));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter, String> {
        self.log_level
            .parse()
            .map_err(|_| format!("unknown log level `{}`", self.log_level))
    }

    pub fn projection(&self) -> Projection {
        Projection {
            fov: self.fov,
            near: self.near,
            far: self.far,
        }
    }

    /// Paths of the vertex and fragment shader when loading them from disk.
    pub fn shader_paths(&self) -> Option<(PathBuf, PathBuf)> {
        self.shader_dir
            .as_ref()
            .map(|dir| (dir.join("shader.vert"), dir.join("shader.frag")))
    }
}
