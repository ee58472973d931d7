use crate::canvas::model::Color;
use crate::canvas::surface::{BlendMode, FillPaint, LineCap, StrokePaint, Surface};
use image::{Rgba, RgbaImage};
use std::f32::consts::SQRT_2;

/// Pixel-aligned area with exclusive `right`/`bottom` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    /// Smallest rect holding every pixel within `pad` of the box `min..=max`.
    pub fn around(min: (f32, f32), max: (f32, f32), pad: f32) -> Self {
        Self {
            left: (min.0 - pad).floor() as i32,
            top: (min.1 - pad).floor() as i32,
            right: (max.0 + pad).ceil() as i32 + 1,
            bottom: (max.1 + pad).ceil() as i32 + 1,
        }
    }

    pub fn of_size(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: i32::try_from(width).unwrap_or(i32::MAX),
            bottom: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }

    pub fn intersect(self, other: PixelRect) -> Option<PixelRect> {
        let rect = PixelRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (rect.left < rect.right && rect.top < rect.bottom).then_some(rect)
    }

    pub fn width(&self) -> usize {
        (self.right - self.left).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.bottom - self.top).max(0) as usize
    }
}

/// Pixels covered by one draw call.
///
/// Shapes mark into the mask within their own bounds; the mask is composited
/// once afterwards so overlapping pieces of one call never stack.
struct CoverageMask {
    area: PixelRect,
    covered: Vec<bool>,
}

impl CoverageMask {
    fn new(area: PixelRect) -> Self {
        Self {
            area,
            covered: vec![false; area.width() * area.height()],
        }
    }

    /// Marks the pixels inside `bounds` whose centers satisfy `covers`.
    fn mark<F>(&mut self, bounds: PixelRect, covers: F)
    where
        F: Fn((f32, f32)) -> bool,
    {
        let Some(rect) = bounds.intersect(self.area) else {
            return;
        };
        let stride = self.area.width();
        for y in rect.top..rect.bottom {
            let row = (y - self.area.top) as usize * stride;
            for x in rect.left..rect.right {
                let slot = &mut self.covered[row + (x - self.area.left) as usize];
                if !*slot && covers((x as f32 + 0.5, y as f32 + 0.5)) {
                    *slot = true;
                }
            }
        }
    }

    fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let stride = self.area.width();
        self.covered
            .iter()
            .enumerate()
            .filter(|(_, covered)| **covered)
            .map(move |(index, _)| {
                let x = self.area.left + (index % stride) as i32;
                let y = self.area.top + (index / stride) as i32;
                (x as u32, y as u32)
            })
    }
}

/// CPU surface backed by an RGBA8 buffer.
///
/// Coverage is sampled once per pixel at the pixel center. Each draw call
/// composites a pixel at most once, so overlapping segments of one polyline
/// do not stack translucent color. Joins are always rendered round.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    present_count: u64,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            present_count: 0,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn present_count(&self) -> u64 {
        self.present_count
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let [r, g, b, a] = self.pixels.get_pixel(x, y).0;
        Color::rgba(r, g, b, a)
    }

    fn mask_for(&self, area: PixelRect) -> Option<CoverageMask> {
        let (width, height) = self.pixels.dimensions();
        area.intersect(PixelRect::of_size(width, height))
            .map(CoverageMask::new)
    }

    fn composite(&mut self, mask: &CoverageMask, color: Color, blend: BlendMode) {
        for (x, y) in mask.pixels() {
            let px = self.pixels.get_pixel_mut(x, y);
            *px = match blend {
                BlendMode::Clear => Rgba([0, 0, 0, 0]),
                BlendMode::SourceOver => {
                    let [r, g, b, a] = px.0;
                    Rgba(blend_pixel(Color::rgba(r, g, b, a), color).to_rgba_array())
                }
            };
        }
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    fn draw_image_at_origin(&mut self, image: &RgbaImage) {
        let width = self.pixels.width().min(image.width());
        let height = self.pixels.height().min(image.height());
        for y in 0..height {
            for x in 0..width {
                let [sr, sg, sb, sa] = image.get_pixel(x, y).0;
                if sa == 0 {
                    continue;
                }
                let dst = self.pixels.get_pixel_mut(x, y);
                if sa == u8::MAX {
                    *dst = Rgba([sr, sg, sb, sa]);
                    continue;
                }
                let [dr, dg, db, da] = dst.0;
                let out = blend_pixel(Color::rgba(dr, dg, db, da), Color::rgba(sr, sg, sb, sa));
                *dst = Rgba(out.to_rgba_array());
            }
        }
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), paint: &StrokePaint) {
        self.draw_polyline(&[from, to], paint);
    }

    fn draw_circle(&mut self, center: (f32, f32), radius: f32, paint: &FillPaint) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let bounds = PixelRect::around(center, center, radius + 1.0);
        let Some(mut mask) = self.mask_for(bounds) else {
            return;
        };
        let radius_sq = radius * radius;
        mask.mark(bounds, |p| distance_sq(p, center) <= radius_sq);
        self.composite(&mask, paint.color, paint.blend);
    }

    fn draw_polyline(&mut self, points: &[(f32, f32)], paint: &StrokePaint) {
        let radius = paint.width * 0.5;
        if points.is_empty() || radius.is_nan() || radius <= 0.0 {
            return;
        }
        // Square caps reach past the endpoint by the radius in both axes.
        let pad = radius * SQRT_2 + 1.0;

        let (min, max) = points.iter().fold((points[0], points[0]), |(min, max), p| {
            ((min.0.min(p.0), min.1.min(p.1)), (max.0.max(p.0), max.1.max(p.1)))
        });
        let Some(mut mask) = self.mask_for(PixelRect::around(min, max, pad)) else {
            return;
        };

        if let [only] = points {
            let only = *only;
            mask.mark(PixelRect::around(only, only, pad), |p| {
                segment_covers(p, only, only, radius, paint.cap, paint.cap)
            });
        } else {
            let last = points.len() - 2;
            for (index, segment) in points.windows(2).enumerate() {
                let (start, end) = (segment[0], segment[1]);
                let start_cap = if index == 0 { paint.cap } else { LineCap::Round };
                let end_cap = if index == last { paint.cap } else { LineCap::Round };
                let bounds = PixelRect::around(
                    (start.0.min(end.0), start.1.min(end.1)),
                    (start.0.max(end.0), start.1.max(end.1)),
                    pad,
                );
                mask.mark(bounds, |p| {
                    segment_covers(p, start, end, radius, start_cap, end_cap)
                });
            }
        }
        self.composite(&mask, paint.color, paint.blend);
    }

    fn flush(&mut self) {
        self.present_count = self.present_count.saturating_add(1);
    }
}
fn distance_sq(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

fn segment_covers(
    point: (f32, f32),
    start: (f32, f32),
    end: (f32, f32),
    radius: f32,
    start_cap: LineCap,
    end_cap: LineCap,
) -> bool {
    let radius_sq = radius * radius;
    let vx = end.0 - start.0;
    let vy = end.1 - start.1;
    let len_sq = vx * vx + vy * vy;

    if len_sq <= f32::EPSILON {
        return match start_cap {
            LineCap::Round => distance_sq(point, start) <= radius_sq,
            LineCap::Square => {
                (point.0 - start.0).abs() <= radius && (point.1 - start.1).abs() <= radius
            }
            LineCap::Butt => false,
        };
    }

    let len = len_sq.sqrt();
    let t = ((point.0 - start.0) * vx + (point.1 - start.1) * vy) / len_sq;
    let t_min = if start_cap == LineCap::Square {
        -radius / len
    } else {
        0.0
    };
    let t_max = if end_cap == LineCap::Square {
        1.0 + radius / len
    } else {
        1.0
    };
    if t >= t_min && t <= t_max {
        let closest = (start.0 + vx * t, start.1 + vy * t);
        if distance_sq(point, closest) <= radius_sq {
            return true;
        }
    }

    (start_cap == LineCap::Round && distance_sq(point, start) <= radius_sq)
        || (end_cap == LineCap::Round && distance_sq(point, end) <= radius_sq)
}

/// Straight-alpha source-over of `src` onto `dst`.
pub fn blend_pixel(dst: Color, src: Color) -> Color {
    let src_alpha = f32::from(src.a) / 255.0;
    let dst_weight = f32::from(dst.a) / 255.0 * (1.0 - src_alpha);
    let alpha = src_alpha + dst_weight;
    if alpha <= f32::EPSILON {
        return Color::TRANSPARENT;
    }

    let channel = |s: u8, d: u8| to_channel((f32::from(s) * src_alpha + f32::from(d) * dst_weight) / alpha);
    Color {
        r: channel(src.r, dst.r),
        g: channel(src.g, dst.g),
        b: channel(src.b, dst.b),
        a: to_channel(alpha * 255.0),
    }
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
