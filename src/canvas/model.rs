use serde::{Deserialize, Serialize};

/// Identifies one active contact (mouse, single touch, or pen) for the
/// lifetime of its down/up gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Mouse,
    Pen,
    Touch,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const RED: Self = Self::rgba(255, 0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Scales alpha by `opacity`, clamped to `[0, 1]`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            a: (self.a as f32 * opacity).round().clamp(0.0, 255.0) as u8,
            ..self
        }
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A single captured input sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenPoint {
    pub x: f32,
    pub y: f32,
    /// Absent for devices without pressure sensing.
    #[serde(default)]
    pub pressure: Option<f32>,
    pub radius: f32,
    #[serde(default)]
    pub is_pen: bool,
}

impl PenPoint {
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// One stroke. Points are kept in capture order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenPath {
    pub points: Vec<PenPoint>,
    pub fill_color: Color,
    #[serde(default)]
    pub is_erase: bool,
}

impl PenPath {
    pub fn new(fill_color: Color, is_erase: bool) -> Self {
        Self {
            points: Vec::new(),
            fill_color,
            is_erase,
        }
    }

    pub fn push(&mut self, point: PenPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn has_pen_points(&self) -> bool {
        self.points.iter().any(|point| point.is_pen)
    }

    /// Drawable polyline through every point, used when the stroke carries no
    /// pen samples.
    pub fn polyline(&self) -> Vec<(f32, f32)> {
        self.points.iter().map(PenPoint::position).collect()
    }
}
