use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Kinds of session-owned resources whose lifetime is accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Raster surface used as the compositing target.
    Surface,
    /// Prepared audio track (and its backing temp file, if any).
    AudioGraph,
}

/// Snapshot of live resource counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// Live raster surfaces.
    pub surfaces: usize,
    /// Live audio graphs.
    pub audio_graphs: usize,
    /// Surfaces ever allocated.
    pub surfaces_allocated: u64,
    /// Audio graphs ever opened.
    pub audio_graphs_opened: u64,
}

impl ResourceStats {
    /// `true` when nothing is currently held.
    pub fn all_released(&self) -> bool {
        self.surfaces == 0 && self.audio_graphs == 0
    }
}

#[derive(Debug, Default)]
struct Counters {
    surfaces: AtomicUsize,
    audio_graphs: AtomicUsize,
    surfaces_allocated: AtomicUsize,
    audio_graphs_opened: AtomicUsize,
}

/// Shared counter of live render-session resources.
///
/// Resources hold a [`ResourceLease`]; dropping the lease releases the count, so every exit path
/// of a render (completion, abort, failure) is covered by ordinary drop order.
#[derive(Debug, Clone, Default)]
pub struct ResourceTracker {
    inner: Arc<Counters>,
}

impl ResourceTracker {
    /// Create a tracker with all counts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counts.
    pub fn stats(&self) -> ResourceStats {
        ResourceStats {
            surfaces: self.inner.surfaces.load(Ordering::Acquire),
            audio_graphs: self.inner.audio_graphs.load(Ordering::Acquire),
            surfaces_allocated: self.inner.surfaces_allocated.load(Ordering::Acquire) as u64,
            audio_graphs_opened: self.inner.audio_graphs_opened.load(Ordering::Acquire) as u64,
        }
    }

    pub(crate) fn acquire(&self, kind: ResourceKind) -> ResourceLease {
        let (live, total) = self.counters(kind);
        live.fetch_add(1, Ordering::AcqRel);
        total.fetch_add(1, Ordering::AcqRel);
        ResourceLease {
            tracker: self.clone(),
            kind,
        }
    }

    fn counters(&self, kind: ResourceKind) -> (&AtomicUsize, &AtomicUsize) {
        match kind {
            ResourceKind::Surface => (&self.inner.surfaces, &self.inner.surfaces_allocated),
            ResourceKind::AudioGraph => {
                (&self.inner.audio_graphs, &self.inner.audio_graphs_opened)
            }
        }
    }
}

/// RAII token for one live resource.
#[derive(Debug)]
pub(crate) struct ResourceLease {
    tracker: ResourceTracker,
    kind: ResourceKind,
}

impl Drop for ResourceLease {
    fn drop(&mut self) {
        let (live, _) = self.tracker.counters(self.kind);
        live.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/resources.rs"]
mod tests;
