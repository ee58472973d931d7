use crate::canvas::model::PenPath;
use std::sync::{Arc, RwLock};

/// Finalized strokes in render order.
///
/// The sequence is never mutated in place: every write swaps in a freshly
/// built vector, so a snapshot taken by a render pass stays valid until the
/// pass drops it.
#[derive(Debug, Default)]
pub struct CommittedPaths {
    current: RwLock<Arc<Vec<PenPath>>>,
}

impl CommittedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<Vec<PenPath>> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, paths: Vec<PenPath>) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(paths);
    }

    pub fn append(&self, path: PenPath) {
        self.extend(std::iter::once(path));
    }

    pub fn extend(&self, paths: impl IntoIterator<Item = PenPath>) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next: Vec<PenPath> = guard.as_ref().clone();
        next.extend(paths);
        *guard = Arc::new(next);
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::model::{Color, PenPoint};

    fn path(x: f32) -> PenPath {
        let mut path = PenPath::new(Color::BLACK, false);
        path.push(PenPoint {
            x,
            y: 0.0,
            pressure: None,
            radius: 1.0,
            is_pen: false,
        });
        path
    }

    #[test]
    fn snapshot_survives_later_replace() {
        let store = CommittedPaths::new();
        store.append(path(1.0));
        let before = store.snapshot();

        store.append(path(2.0));
        store.clear();

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].points[0].x, 1.0);
        assert!(store.is_empty());
    }

    #[test]
    fn append_keeps_insertion_order() {
        let store = CommittedPaths::new();
        store.append(path(1.0));
        store.extend(vec![path(2.0), path(3.0)]);

        let xs: Vec<f32> = store.snapshot().iter().map(|p| p.points[0].x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn reader_iterating_while_writer_replaces_sees_whole_sequence() {
        let store = std::sync::Arc::new(CommittedPaths::new());
        store.replace((0..50).map(|i| path(i as f32)).collect());

        let reader = {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let snapshot = store.snapshot();
                    let count = snapshot.iter().count();
                    assert!(count >= 50);
                    assert_eq!(count, snapshot.len());
                }
            })
        };
        for i in 50..100 {
            store.append(path(i as f32));
        }
        reader.join().expect("reader thread");
        assert_eq!(store.len(), 100);
    }
}
