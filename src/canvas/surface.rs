use crate::canvas::model::Color;
use image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    SourceOver,
    /// Covered pixels become fully transparent.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePaint {
    pub color: Color,
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub blend: BlendMode,
}

impl StrokePaint {
    pub fn round(color: Color, width: f32, blend: BlendMode) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
            blend,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillPaint {
    pub color: Color,
    pub blend: BlendMode,
}

/// Drawing target for a render pass.
///
/// Hosts plug their own backend in here; [`crate::canvas::raster::RasterSurface`]
/// is the CPU implementation used for snapshots and tests.
pub trait Surface {
    /// Resets every pixel to fully transparent.
    fn clear(&mut self);

    fn draw_image_at_origin(&mut self, image: &RgbaImage);

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), paint: &StrokePaint);

    fn draw_circle(&mut self, center: (f32, f32), radius: f32, paint: &FillPaint);

    fn draw_polyline(&mut self, points: &[(f32, f32)], paint: &StrokePaint);

    fn flush(&mut self);
}
