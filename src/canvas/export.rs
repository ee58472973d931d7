use anyhow::{anyhow, Context, Result};
use chrono::Local;
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

pub const EXPORT_SUBDIR: &str = "canvas_exports";

pub fn export_folder_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(EXPORT_SUBDIR))
}

/// Resolves the export folder (configured, or next to the executable) and
/// makes sure it exists.
pub fn ensure_export_folder(configured: Option<&str>) -> Result<PathBuf> {
    let output = match configured {
        Some(folder) if !folder.trim().is_empty() => PathBuf::from(folder),
        _ => {
            let exe_path = std::env::current_exe().context("resolve current executable")?;
            export_folder_from_exe_path(&exe_path)?
        }
    };
    fs::create_dir_all(&output)
        .with_context(|| format!("create canvas export folder {}", output.display()))?;
    Ok(output)
}

pub fn timestamped_file_name(now: chrono::DateTime<Local>) -> String {
    format!("canvas_{}.png", now.format("%Y%m%d_%H%M%S"))
}

pub fn export_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("write canvas snapshot {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "canvas snapshot exported"
    );
    Ok(())
}
