use crate::canvas::input::BrushState;
use crate::canvas::model::Color;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "canvas_settings.json";
const MIN_BRUSH_SIZE: f32 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasSettings {
    #[serde(default = "default_brush_color")]
    pub brush_color: Color,
    #[serde(default = "default_brush_opacity")]
    pub brush_opacity: f32,
    #[serde(default = "default_brush_size")]
    pub brush_size: f32,
    #[serde(default)]
    pub erase_mode: bool,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional log file; logs go to stdout only when absent.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Folder for PNG snapshots. Defaults to `canvas_exports` next to the
    /// executable.
    #[serde(default)]
    pub export_folder: Option<String>,
    #[serde(default = "default_include_background_in_export")]
    pub include_background_in_export: bool,
}

fn default_brush_color() -> Color {
    Color::BLACK
}

fn default_brush_opacity() -> f32 {
    1.0
}

fn default_brush_size() -> f32 {
    8.0
}

fn default_include_background_in_export() -> bool {
    true
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            brush_color: default_brush_color(),
            brush_opacity: default_brush_opacity(),
            brush_size: default_brush_size(),
            erase_mode: false,
            debug_logging: false,
            log_file: None,
            export_folder: None,
            include_background_in_export: default_include_background_in_export(),
        }
    }
}

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

impl CanvasSettings {
    /// Missing or empty files load as defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("read canvas settings {path}"));
            }
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("deserialize canvas settings {path}"))?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let mut sanitized = self.clone();
        sanitized.sanitize();
        let json = serde_json::to_string_pretty(&sanitized).context("serialize canvas settings")?;
        std::fs::write(path, json).with_context(|| format!("write canvas settings {path}"))
    }

    pub fn sanitize(&mut self) {
        self.brush_opacity = if self.brush_opacity.is_finite() {
            self.brush_opacity.clamp(0.0, 1.0)
        } else {
            default_brush_opacity()
        };
        if !self.brush_size.is_finite() || self.brush_size < MIN_BRUSH_SIZE {
            tracing::warn!(
                "brush size {} is invalid; using {}",
                self.brush_size,
                MIN_BRUSH_SIZE
            );
            self.brush_size = MIN_BRUSH_SIZE;
        }
    }

    pub fn brush(&self) -> BrushState {
        BrushState {
            color: self.brush_color,
            opacity: self.brush_opacity,
            size: self.brush_size,
            erase_mode: self.erase_mode,
            zoom: 1.0,
        }
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_path_is_resolved_next_to_executable() {
        let exe = Path::new("/tmp/app/bin/paint_canvas");
        let path = settings_path_from_exe_path(exe).expect("path");
        assert_eq!(path, Path::new("/tmp/app/bin").join(SETTINGS_FILE_NAME));
    }

    #[test]
    fn sanitize_clamps_opacity_and_size() {
        let mut settings = CanvasSettings {
            brush_opacity: 4.0,
            brush_size: -2.0,
            ..CanvasSettings::default()
        };
        settings.sanitize();
        assert_eq!(settings.brush_opacity, 1.0);
        assert_eq!(settings.brush_size, MIN_BRUSH_SIZE);
    }

    #[test]
    fn brush_state_mirrors_settings() {
        let settings = CanvasSettings {
            brush_color: Color::RED,
            brush_opacity: 0.25,
            brush_size: 3.0,
            erase_mode: true,
            ..CanvasSettings::default()
        };
        let brush = settings.brush();
        assert_eq!(brush.color, Color::RED);
        assert_eq!(brush.opacity, 0.25);
        assert_eq!(brush.size, 3.0);
        assert!(brush.erase_mode);
        assert_eq!(brush.zoom, 1.0);
    }

    #[test]
    fn blank_log_file_is_treated_as_absent() {
        let settings = CanvasSettings {
            log_file: Some("  ".into()),
            ..CanvasSettings::default()
        };
        assert_eq!(settings.log_file_path(), None);
    }
}
