use anyhow::{bail, Context, Result};
use paint_canvas::canvas::{document, PaintCanvas};
use paint_canvas::settings::{settings_path_from_exe_path, CanvasSettings};
use std::path::Path;

const DEFAULT_CANVAS_SIZE: (u32, u32) = (512, 512);

/// Renders a saved stroke document (optionally over a background PNG) into
/// the export folder.
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(document_path) = args.next() else {
        bail!("usage: paint_canvas <strokes.json> [background.png]");
    };
    let background_path = args.next();

    let exe_path = std::env::current_exe().context("resolve current executable")?;
    let settings_path = settings_path_from_exe_path(&exe_path)?;
    let settings = CanvasSettings::load(&settings_path.to_string_lossy())?;
    paint_canvas::logging::init(settings.debug_logging, settings.log_file_path());

    let document = document::load_from_path(Path::new(&document_path))?
        .with_context(|| format!("canvas document {document_path} not found"))?;

    let mut canvas = PaintCanvas::new(&settings, DEFAULT_CANVAS_SIZE);
    if let Some(background_path) = background_path {
        let background = image::open(&background_path)
            .with_context(|| format!("open background image {background_path}"))?
            .to_rgba8();
        canvas.set_background(Some(background));
    }
    canvas.load_document(document);

    let output = canvas.export_snapshot(&settings)?;
    println!("{}", output.display());
    Ok(())
}
