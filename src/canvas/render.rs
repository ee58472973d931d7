use crate::canvas::model::{Color, PenPath, PenPoint};
use crate::canvas::surface::{BlendMode, FillPaint, StrokePaint, Surface};
use image::RgbaImage;

/// Pen segment width multiplier applied to `pressure × radius`.
pub const PEN_WIDTH_SCALE: f32 = 2.5;
/// Polyline width multiplier for strokes without pen samples.
pub const FALLBACK_WIDTH_SCALE: f32 = 2.0;

/// Composites one frame. Reads the model only; rendering the same inputs twice
/// yields the same pixels.
pub fn render_frame<S>(
    surface: &mut S,
    background: Option<&RgbaImage>,
    layers: &[RgbaImage],
    in_progress: &[PenPath],
    committed: &[PenPath],
    include_background: bool,
) where
    S: Surface + ?Sized,
{
    surface.clear();

    if include_background {
        if let Some(background) = background {
            surface.draw_image_at_origin(background);
        }
    }

    for layer in layers {
        surface.draw_image_at_origin(layer);
    }

    for path in in_progress.iter().chain(committed.iter()) {
        render_stroke(surface, path);
    }

    surface.flush();
}

pub fn render_stroke<S>(surface: &mut S, path: &PenPath)
where
    S: Surface + ?Sized,
{
    let Some(first) = path.points.first() else {
        return;
    };
    let (color, blend) = stroke_color(path);

    if !path.has_pen_points() {
        let paint = StrokePaint::round(color, fallback_width(first), blend);
        surface.draw_polyline(&path.polyline(), &paint);
        return;
    }

    for pair in path.points.windows(2) {
        let (previous, point) = (&pair[0], &pair[1]);
        if !point.is_pen {
            continue;
        }
        let width = pen_segment_width(point);
        surface.draw_line(
            previous.position(),
            point.position(),
            &StrokePaint::round(color, width, blend),
        );
        surface.draw_circle(point.position(), width * 0.5, &FillPaint { color, blend });
    }
}

pub fn pen_segment_width(point: &PenPoint) -> f32 {
    point.pressure.unwrap_or(1.0) * point.radius * PEN_WIDTH_SCALE
}

pub fn fallback_width(first: &PenPoint) -> f32 {
    first.radius * FALLBACK_WIDTH_SCALE
}

fn stroke_color(path: &PenPath) -> (Color, BlendMode) {
    if path.is_erase {
        (Color::TRANSPARENT, BlendMode::Clear)
    } else {
        (path.fill_color, BlendMode::SourceOver)
    }
}
