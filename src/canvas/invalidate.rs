use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct InvalidateState {
    pending: AtomicBool,
    requested: AtomicU64,
    posted: AtomicU64,
    waker: Mutex<Option<Waker>>,
}

/// Coalescing redraw request.
///
/// Requests only raise a pending flag; the waker (which should post a redraw
/// to the host's UI loop, never render inline) runs once per pending period.
/// The host clears the flag with [`Invalidator::take`] when it produces the
/// frame.
#[derive(Clone, Default)]
pub struct Invalidator {
    state: Arc<InvalidateState>,
}

impl Invalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_waker<F>(&self, waker: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut guard = self
            .state
            .waker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::new(waker));
    }

    pub fn request(&self) {
        self.state.requested.fetch_add(1, Ordering::Relaxed);
        if self.state.pending.swap(true, Ordering::AcqRel) {
            return;
        }
        self.state.posted.fetch_add(1, Ordering::Relaxed);
        let waker = self
            .state
            .waker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(waker) = waker {
            waker();
        }
    }

    /// Returns whether a frame was requested since the last call.
    pub fn take(&self) -> bool {
        self.state.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.load(Ordering::Acquire)
    }

    pub fn requested_count(&self) -> u64 {
        self.state.requested.load(Ordering::Relaxed)
    }

    /// Number of coalesced redraws posted to the waker.
    pub fn posted_count(&self) -> u64 {
        self.state.posted.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for Invalidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invalidator")
            .field("pending", &self.is_pending())
            .field("requested", &self.requested_count())
            .field("posted", &self.posted_count())
            .finish()
    }
}
