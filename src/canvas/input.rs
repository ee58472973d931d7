use crate::canvas::capture::StrokeCapture;
use crate::canvas::invalidate::Invalidator;
use crate::canvas::model::{Color, DeviceKind, PointerId};
use crate::canvas::store::CommittedPaths;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pointer_id: PointerId,
    pub device: DeviceKind,
    pub position: (f32, f32),
    pub pressure: Option<f32>,
    /// Button that changed state for down/up samples, if the device has one.
    pub button: Option<PointerButton>,
}

impl PointerSample {
    pub fn is_finite(&self) -> bool {
        self.position.0.is_finite() && self.position.1.is_finite()
    }

    /// Pressure as stored on a point: clamped for pen and touch, dropped for
    /// devices without a pressure sensor.
    pub fn device_pressure(&self) -> Option<f32> {
        match self.device {
            DeviceKind::Pen | DeviceKind::Touch => self.pressure.map(|p| p.clamp(0.0, 1.0)),
            DeviceKind::Mouse | DeviceKind::Unknown => None,
        }
    }

    /// Stylus hover without contact is reported as exactly zero pressure.
    pub fn is_hover(&self) -> bool {
        self.pressure == Some(0.0)
    }
}

/// One delivered pointer callback.
///
/// `intermediate` holds every sample the platform coalesced since the last
/// delivered event, ending with the current one. Hosts that cannot retrieve
/// them leave it empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub sample: PointerSample,
    pub intermediate: Vec<PointerSample>,
}

impl PointerEvent {
    pub fn new(sample: PointerSample) -> Self {
        Self {
            sample,
            intermediate: Vec::new(),
        }
    }

    pub fn with_intermediate(sample: PointerSample, intermediate: Vec<PointerSample>) -> Self {
        Self {
            sample,
            intermediate,
        }
    }

    pub fn pointer_id(&self) -> PointerId {
        self.sample.pointer_id
    }

    pub fn batch(&self) -> &[PointerSample] {
        if self.intermediate.is_empty() {
            std::slice::from_ref(&self.sample)
        } else {
            &self.intermediate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Brush observables supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    pub color: Color,
    pub opacity: f32,
    pub size: f32,
    pub erase_mode: bool,
    pub zoom: f32,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            opacity: 1.0,
            size: 8.0,
            erase_mode: false,
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Ignored,
    Handled,
    /// A finished stroke was appended to the committed sequence.
    Committed,
}

const NO_PRESSURE: u32 = u32::MAX;

/// Last pressure seen in a processed move batch, readable from any thread.
#[derive(Debug, Clone)]
pub struct PressureMonitor {
    bits: Arc<AtomicU32>,
    updates: Arc<AtomicU64>,
}

impl Default for PressureMonitor {
    fn default() -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(NO_PRESSURE)),
            updates: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl PressureMonitor {
    pub fn current(&self) -> Option<f32> {
        match self.bits.load(Ordering::Acquire) {
            NO_PRESSURE => None,
            bits => Some(f32::from_bits(bits)),
        }
    }

    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::Acquire)
    }

    fn set(&self, pressure: Option<f32>) {
        let bits = pressure.map(f32::to_bits).unwrap_or(NO_PRESSURE);
        self.bits.store(bits, Ordering::Release);
        self.updates.fetch_add(1, Ordering::AcqRel);
    }
}

/// Pointer gesture state machine.
///
/// A pointer is Down while its id is in `down`; everything else is Idle.
#[derive(Debug)]
pub struct InputDispatcher {
    capture: Arc<StrokeCapture>,
    committed: Arc<CommittedPaths>,
    down: BTreeSet<PointerId>,
    enabled: bool,
    brush: BrushState,
    pressure: PressureMonitor,
    invalidator: Invalidator,
}

impl InputDispatcher {
    pub fn new(brush: BrushState, invalidator: Invalidator) -> Self {
        Self {
            capture: Arc::new(StrokeCapture::new()),
            committed: Arc::new(CommittedPaths::new()),
            down: BTreeSet::new(),
            enabled: true,
            brush,
            pressure: PressureMonitor::default(),
            invalidator,
        }
    }

    pub fn capture(&self) -> &Arc<StrokeCapture> {
        &self.capture
    }

    pub fn committed(&self) -> &Arc<CommittedPaths> {
        &self.committed
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut BrushState {
        &mut self.brush
    }

    pub fn pressure(&self) -> &PressureMonitor {
        &self.pressure
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_down(&self, pointer: PointerId) -> bool {
        self.down.contains(&pointer)
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> InputOutcome {
        if !self.enabled {
            return InputOutcome::Ignored;
        }
        let sample = &event.sample;
        if sample.device == DeviceKind::Mouse && sample.button != Some(PointerButton::Primary) {
            return InputOutcome::Ignored;
        }

        let pointer = sample.pointer_id;
        self.down.insert(pointer);
        self.capture.begin_or_continue(pointer, sample, &self.brush);
        self.invalidator.request();
        InputOutcome::Handled
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> InputOutcome {
        if !self.enabled {
            return InputOutcome::Ignored;
        }
        let pointer = event.pointer_id();
        if !self.down.contains(&pointer) {
            return InputOutcome::Ignored;
        }
        if event.sample.is_hover() {
            return InputOutcome::Ignored;
        }

        let mut accepted = event.batch().iter().filter(|sample| !sample.is_hover()).peekable();
        let Some(first) = accepted.peek() else {
            return InputOutcome::Ignored;
        };
        self.pressure.set(first.device_pressure());
        for sample in accepted {
            self.capture.begin_or_continue(pointer, sample, &self.brush);
        }
        self.invalidator.request();
        InputOutcome::Handled
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> InputOutcome {
        if !self.enabled {
            return InputOutcome::Ignored;
        }
        let sample = &event.sample;
        let pointer = sample.pointer_id;

        if !self.down.remove(&pointer) {
            self.capture.discard(pointer);
            return if sample.device == DeviceKind::Touch {
                InputOutcome::Handled
            } else {
                InputOutcome::Ignored
            };
        }

        self.capture.begin_or_continue(pointer, sample, &self.brush);
        let outcome = match self.capture.take(pointer) {
            Some(path) => {
                tracing::debug!(?pointer, points = path.len(), "stroke committed");
                self.committed.append(path);
                InputOutcome::Committed
            }
            None => InputOutcome::Handled,
        };
        self.invalidator.request();
        outcome
    }

    /// Escape is reported as handled so the host does not act on it; it never
    /// changes pointer state.
    pub fn on_key(&mut self, key: Key) -> bool {
        self.enabled && key == Key::Escape
    }

    /// Disabling flushes every in-progress stroke into the committed sequence.
    /// Returns the number of strokes flushed.
    pub fn set_enabled(&mut self, enabled: bool) -> usize {
        if self.enabled == enabled {
            return 0;
        }
        self.enabled = enabled;
        if enabled {
            return 0;
        }

        self.down.clear();
        let flushed = self.capture.drain();
        let count = flushed.len();
        if count > 0 {
            self.committed.extend(flushed);
        }
        tracing::debug!(count, "input disabled; in-progress strokes flushed");
        self.invalidator.request();
        count
    }

    pub fn clear_all(&mut self) {
        self.down.clear();
        let _ = self.capture.drain();
        self.committed.clear();
        tracing::info!("canvas cleared");
        self.invalidator.request();
    }
}
