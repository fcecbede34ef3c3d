//! Progress Reporting
//!
//! Shared progress state for the dump phase. Workers increment the
//! counter; an independent reporting loop reads snapshots without ever
//! blocking them.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Sink for aggregate batch progress
pub trait ProgressSink: Sync {
    fn set_total(&self, total: usize);
    /// Called exactly once per completed item, from any worker thread
    fn inc(&self);
    fn finish(&self);
}

/// Lock-free progress counter
#[derive(Debug, Default)]
pub struct AtomicProgress {
    total: AtomicUsize,
    done: AtomicUsize,
    finished: AtomicBool,
}

impl AtomicProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current (done, total) pair
    pub fn snapshot(&self) -> (usize, usize) {
        (
            self.done.load(Ordering::SeqCst),
            self.total.load(Ordering::SeqCst),
        )
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ProgressSink for AtomicProgress {
    fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn inc(&self) {
        self.done.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

/// Discards all progress events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn set_total(&self, _total: usize) {}
    fn inc(&self) {}
    fn finish(&self) {}
}
