use crate::canvas::cursor::{CursorCache, CursorImage};
use crate::canvas::document::CanvasDocument;
use crate::canvas::export::{ensure_export_folder, export_png, timestamped_file_name};
use crate::canvas::input::{BrushState, InputDispatcher, InputOutcome, Key, PointerEvent, PressureMonitor};
use crate::canvas::invalidate::Invalidator;
use crate::canvas::model::PenPath;
use crate::canvas::raster::RasterSurface;
use crate::canvas::render::render_frame;
use crate::canvas::surface::Surface;
use crate::settings::CanvasSettings;
use anyhow::Result;
use chrono::Local;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

/// Paint canvas: input dispatch, stroke stores, and compositing inputs.
#[derive(Debug)]
pub struct PaintCanvas {
    input: InputDispatcher,
    background: Option<RgbaImage>,
    layers: Vec<RgbaImage>,
    size: (u32, u32),
    invalidator: Invalidator,
    cursor: CursorCache,
}

impl PaintCanvas {
    pub fn new(settings: &CanvasSettings, size: (u32, u32)) -> Self {
        let invalidator = Invalidator::new();
        Self {
            input: InputDispatcher::new(settings.brush(), invalidator.clone()),
            background: None,
            layers: Vec::new(),
            size,
            invalidator,
            cursor: CursorCache::default(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size != (width, height) {
            self.size = (width, height);
            self.invalidator.request();
        }
    }

    pub fn brush(&self) -> &BrushState {
        self.input.brush()
    }

    pub fn brush_mut(&mut self) -> &mut BrushState {
        self.input.brush_mut()
    }

    pub fn invalidator(&self) -> &Invalidator {
        &self.invalidator
    }

    /// Clears the pending redraw flag; returns whether a frame is due.
    pub fn take_invalidation(&self) -> bool {
        self.invalidator.take()
    }

    pub fn pressure(&self) -> &PressureMonitor {
        self.input.pressure()
    }

    /// Adopts the background's dimensions as the canvas size.
    pub fn set_background(&mut self, background: Option<RgbaImage>) {
        if let Some(image) = &background {
            self.size = image.dimensions();
        }
        self.background = background;
        self.invalidator.request();
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn set_layers(&mut self, layers: Vec<RgbaImage>) {
        self.layers = layers;
        self.invalidator.request();
    }

    pub fn push_layer(&mut self, layer: RgbaImage) {
        self.layers.push(layer);
        self.invalidator.request();
    }

    pub fn layers(&self) -> &[RgbaImage] {
        &self.layers
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> InputOutcome {
        self.input.on_pointer_down(event)
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> InputOutcome {
        self.input.on_pointer_move(event)
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> InputOutcome {
        self.input.on_pointer_up(event)
    }

    pub fn on_key(&mut self, key: Key) -> bool {
        self.input.on_key(key)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> usize {
        self.input.set_enabled(enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.input.is_enabled()
    }

    pub fn clear_all(&mut self) {
        self.input.clear_all();
    }

    pub fn in_progress(&self) -> Vec<PenPath> {
        self.input.capture().snapshot()
    }

    pub fn committed(&self) -> Arc<Vec<PenPath>> {
        self.input.committed().snapshot()
    }

    pub fn render<S>(&self, surface: &mut S, include_background: bool)
    where
        S: Surface + ?Sized,
    {
        let in_progress = self.input.capture().snapshot();
        let committed = self.input.committed().snapshot();
        render_frame(
            surface,
            self.background.as_ref(),
            &self.layers,
            &in_progress,
            &committed,
            include_background,
        );
    }

    /// Renders into an offscreen buffer through the live render path.
    pub fn snapshot(&self, include_background: bool) -> RgbaImage {
        let mut surface = RasterSurface::new(self.size.0, self.size.1);
        self.render(&mut surface, include_background);
        surface.into_image()
    }

    pub fn export_snapshot(&self, settings: &CanvasSettings) -> Result<PathBuf> {
        let folder = ensure_export_folder(settings.export_folder.as_deref())?;
        let path = folder.join(timestamped_file_name(Local::now()));
        export_png(&self.snapshot(settings.include_background_in_export), &path)?;
        Ok(path)
    }

    pub fn cursor(&mut self) -> &CursorImage {
        let brush = *self.input.brush();
        self.cursor.cursor(brush.size, brush.zoom)
    }

    pub fn to_document(&self) -> CanvasDocument {
        CanvasDocument::new(self.committed().as_ref().clone())
    }

    /// Replaces the committed strokes and drops anything in progress.
    pub fn load_document(&mut self, document: CanvasDocument) {
        self.input.clear_all();
        tracing::info!(paths = document.paths.len(), "canvas document loaded");
        self.input.committed().replace(document.paths);
    }
}
