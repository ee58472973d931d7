use crate::canvas::input::{BrushState, PointerSample};
use crate::canvas::model::{DeviceKind, PenPath, PenPoint, PointerId};
use hashlink::LinkedHashMap;
use std::sync::{Mutex, MutexGuard};

/// In-progress strokes keyed by pointer id.
///
/// Every method takes `&self`; the table is shared between the pointer-event
/// path and the disable/flush path. Iteration order is insertion order.
#[derive(Debug, Default)]
pub struct StrokeCapture {
    strokes: Mutex<LinkedHashMap<PointerId, PenPath>>,
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LinkedHashMap<PointerId, PenPath>> {
        self.strokes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Appends a point derived from `sample` to the stroke for `pointer`,
    /// creating the stroke first if none exists. Returns `true` when a new
    /// stroke was started.
    pub fn begin_or_continue(
        &self,
        pointer: PointerId,
        sample: &PointerSample,
        brush: &BrushState,
    ) -> bool {
        if !sample.is_finite() {
            tracing::warn!(?pointer, ?sample.position, "dropping non-finite pointer sample");
            return false;
        }
        let point = point_from_sample(sample, brush.size);

        let mut strokes = self.lock();
        if let Some(path) = strokes.get_mut(&pointer) {
            path.push(point);
            return false;
        }

        let mut path = PenPath::new(brush.color.with_opacity(brush.opacity), brush.erase_mode);
        path.push(point);
        let previous = strokes.insert(pointer, path);
        debug_assert!(previous.is_none(), "two in-progress strokes for {pointer:?}");
        tracing::debug!(?pointer, erase = brush.erase_mode, "stroke started");
        true
    }

    pub fn take(&self, pointer: PointerId) -> Option<PenPath> {
        self.lock().remove(&pointer)
    }

    pub fn discard(&self, pointer: PointerId) {
        let _ = self.lock().remove(&pointer);
    }

    /// Removes every in-progress stroke, returned in table order.
    pub fn drain(&self) -> Vec<PenPath> {
        let strokes = std::mem::take(&mut *self.lock());
        strokes.into_iter().map(|(_, path)| path).collect()
    }

    /// Copies the in-progress strokes for a render pass.
    pub fn snapshot(&self) -> Vec<PenPath> {
        self.lock().values().cloned().collect()
    }

    pub fn point_count(&self, pointer: PointerId) -> Option<usize> {
        self.lock().get(&pointer).map(PenPath::len)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn point_from_sample(sample: &PointerSample, radius: f32) -> PenPoint {
    PenPoint {
        x: sample.position.0,
        y: sample.position.1,
        pressure: sample.device_pressure(),
        radius,
        is_pen: sample.device == DeviceKind::Pen,
    }
}
