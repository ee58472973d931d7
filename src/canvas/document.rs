use crate::canvas::model::PenPath;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DOCUMENT_VERSION: u32 = 1;

/// Committed strokes as plain structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub paths: Vec<PenPath>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            paths: Vec::new(),
        }
    }
}

impl CanvasDocument {
    pub fn new(paths: Vec<PenPath>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            paths,
        }
    }
}

/// Returns `None` when the file does not exist.
pub fn load_from_path(path: &Path) -> Result<Option<CanvasDocument>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read canvas document {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Some(CanvasDocument::default()));
    }

    let document: CanvasDocument = serde_json::from_str(&content)
        .with_context(|| format!("deserialize canvas document {}", path.display()))?;
    if document.version > DOCUMENT_VERSION {
        bail!(
            "canvas document {} has unsupported version {} (max {})",
            path.display(),
            document.version,
            DOCUMENT_VERSION
        );
    }
    Ok(Some(document))
}

pub fn save_to_path(path: &Path, document: &CanvasDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("create canvas document folder {}", parent.display())
            })?;
        }
    }

    let json = serde_json::to_string_pretty(document).context("serialize canvas document")?;
    std::fs::write(path, json)
        .with_context(|| format!("write canvas document {}", path.display()))?;
    tracing::info!(path = %path.display(), paths = document.paths.len(), "canvas document saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::model::{Color, PenPoint};

    fn sample_document() -> CanvasDocument {
        let mut path = PenPath::new(Color::rgba(1, 2, 3, 255), true);
        path.push(PenPoint {
            x: 1.5,
            y: 2.5,
            pressure: Some(0.75),
            radius: 4.0,
            is_pen: true,
        });
        CanvasDocument::new(vec![path])
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = load_from_path(&dir.path().join("strokes.json")).expect("load");
        assert_eq!(loaded, None);
    }

    #[test]
    fn empty_file_loads_as_empty_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("strokes.json");
        std::fs::write(&path, "  \n").expect("write");

        let loaded = load_from_path(&path).expect("load");
        assert_eq!(loaded, Some(CanvasDocument::default()));
    }

    #[test]
    fn saved_document_loads_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("strokes.json");
        let document = sample_document();

        save_to_path(&path, &document).expect("save");
        let loaded = load_from_path(&path).expect("load");
        assert_eq!(loaded, Some(document));
    }

    #[test]
    fn newer_version_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("strokes.json");
        std::fs::write(&path, r#"{"version": 99, "paths": []}"#).expect("write");

        let err = load_from_path(&path).expect_err("newer version should fail");
        assert!(err.to_string().contains("unsupported version"));
    }
}
