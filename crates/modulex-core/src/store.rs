//! In-memory accounting for received annotations and frames.
//!
//! Only used for health reporting; dispatch never reads it.

use crate::frames::FrameKind;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Annotations are opaque caller-supplied JSON values.
pub type Annotation = serde_json::Value;

#[derive(Debug, Default)]
pub struct StateStore {
    annotations: Mutex<Vec<Annotation>>,
    images: AtomicU64,
    videos: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub annotations_processed: usize,
    pub images_received: u64,
    pub videos_received: u64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch and return the total number of annotations held.
    pub fn record_annotations(&self, batch: Vec<Annotation>) -> usize {
        let mut annotations = self
            .annotations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        annotations.extend(batch);
        annotations.len()
    }

    pub fn record_frame(&self, kind: FrameKind) -> u64 {
        self.counter(kind).fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn annotations_processed(&self) -> usize {
        self.annotations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn frames_received(&self, kind: FrameKind) -> u64 {
        self.counter(kind).load(Ordering::Relaxed)
    }

    pub fn health(&self) -> Health {
        Health {
            status: "healthy",
            annotations_processed: self.annotations_processed(),
            images_received: self.frames_received(FrameKind::Image),
            videos_received: self.frames_received(FrameKind::Video),
        }
    }

    fn counter(&self, kind: FrameKind) -> &AtomicU64 {
        match kind {
            FrameKind::Image => &self.images,
            FrameKind::Video => &self.videos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn record_annotations_returns_running_total() {
        let store = StateStore::new();
        assert_eq!(store.record_annotations(vec![json!({"label": "door"})]), 1);
        assert_eq!(
            store.record_annotations(vec![json!({"x": 1}), json!({"x": 2})]),
            3
        );
        assert_eq!(store.annotations_processed(), 3);
    }

    #[test]
    fn empty_batch_leaves_count_unchanged() {
        let store = StateStore::new();
        store.record_annotations(vec![json!(1)]);
        assert_eq!(store.record_annotations(Vec::new()), 1);
    }

    #[test]
    fn frame_counters_are_independent() {
        let store = StateStore::new();
        store.record_frame(FrameKind::Image);
        store.record_frame(FrameKind::Image);
        store.record_frame(FrameKind::Video);
        assert_eq!(store.frames_received(FrameKind::Image), 2);
        assert_eq!(store.frames_received(FrameKind::Video), 1);
    }

    #[test]
    fn health_is_read_only() {
        let store = StateStore::new();
        store.record_annotations(vec![json!("a"), json!("b")]);
        let first = store.health();
        let second = store.health();
        assert_eq!(first, second);
        assert_eq!(first.status, "healthy");
        assert_eq!(first.annotations_processed, 2);
    }

    #[test]
    fn concurrent_batches_lose_no_updates() {
        let store = Arc::new(StateStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store.record_annotations(vec![json!(i), json!(i)]);
                        store.record_frame(FrameKind::Image);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.annotations_processed(), 8 * 50 * 2);
        assert_eq!(store.frames_received(FrameKind::Image), 8 * 50);
    }
}
