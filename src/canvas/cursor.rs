use crate::canvas::model::Color;
use image::{Rgba, RgbaImage};

const MAX_CURSOR_RADIUS: u32 = 256;
const RING_PADDING: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct CursorImage {
    pub radius: u32,
    pub image: RgbaImage,
    pub hotspot: (u32, u32),
}

/// Brush outline cursor, regenerated only when the effective radius changes.
#[derive(Debug, Clone)]
pub struct CursorCache {
    color: Color,
    cached: Option<CursorImage>,
    regenerations: u64,
}

impl Default for CursorCache {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

pub fn effective_radius(brush_size: f32, zoom: f32) -> u32 {
    let radius = brush_size * zoom;
    if !radius.is_finite() {
        return 1;
    }
    (radius.round().max(1.0) as u32).min(MAX_CURSOR_RADIUS)
}

impl CursorCache {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            cached: None,
            regenerations: 0,
        }
    }

    pub fn cursor(&mut self, brush_size: f32, zoom: f32) -> &CursorImage {
        let radius = effective_radius(brush_size, zoom);
        if self
            .cached
            .as_ref()
            .is_some_and(|cursor| cursor.radius != radius)
        {
            self.cached = None;
        }

        let color = self.color;
        let regenerations = &mut self.regenerations;
        self.cached.get_or_insert_with(|| {
            tracing::debug!(radius, "regenerating brush cursor");
            *regenerations = regenerations.saturating_add(1);
            draw_ring_cursor(radius, color)
        })
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }
}

/// One antialiased 1px ring centered in a square bitmap.
fn draw_ring_cursor(radius: u32, color: Color) -> CursorImage {
    let size = radius * 2 + RING_PADDING * 2 + 1;
    let center = size as f32 * 0.5;
    let ring = radius as f32;
    let mut image = RgbaImage::new(size, size);

    for (x, y, px) in image.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let distance = (dx * dx + dy * dy).sqrt();
        let coverage = (1.0 - (distance - ring).abs()).clamp(0.0, 1.0);
        if coverage > 0.0 {
            let alpha = (color.a as f32 * coverage).round() as u8;
            *px = Rgba([color.r, color.g, color.b, alpha]);
        }
    }

    CursorImage {
        radius,
        image,
        hotspot: (size / 2, size / 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_scales_with_zoom_and_is_clamped() {
        assert_eq!(effective_radius(10.0, 1.5), 15);
        assert_eq!(effective_radius(0.1, 1.0), 1);
        assert_eq!(effective_radius(10_000.0, 1.0), MAX_CURSOR_RADIUS);
        assert_eq!(effective_radius(f32::NAN, 1.0), 1);
    }

    #[test]
    fn cursor_is_only_regenerated_when_radius_changes() {
        let mut cache = CursorCache::default();
        let _ = cache.cursor(8.0, 1.0);
        let _ = cache.cursor(8.2, 1.0);
        assert_eq!(cache.regenerations(), 1);

        let cursor = cache.cursor(8.0, 2.0);
        assert_eq!(cursor.radius, 16);
        assert_eq!(cache.regenerations(), 2);
    }

    #[test]
    fn ring_is_drawn_on_radius_and_center_is_empty() {
        let mut cache = CursorCache::new(Color::RED);
        let cursor = cache.cursor(6.0, 1.0);
        let (hx, hy) = cursor.hotspot;

        assert_eq!(cursor.image.width(), 6 * 2 + RING_PADDING * 2 + 1);
        assert_eq!(cursor.image.get_pixel(hx, hy).0[3], 0);
        assert!(cursor.image.get_pixel(hx + 6, hy).0[3] > 0);
    }
}
