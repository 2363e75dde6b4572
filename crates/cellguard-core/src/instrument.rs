//! Memory instrumentation for the demos.
//!
//! A [`Tracker`] counts allocations, releases and invalid accesses, and
//! keeps the order they happened in. It plays the role a leak and
//! use-after-free checker plays for native code: the heap reports into it
//! on every operation, and [`Tracked`] values report their own release
//! when dropped.
//!
//! Trackers are single-threaded (`Rc` + `Cell`); clones share counters.
//! The counters are exact for the tracker's whole life; the event log only
//! keeps the most recent [`EVENT_LOG_CAPACITY`] events.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use smallvec::SmallVec;

/// Number of events kept by a [`Tracker`]'s log. Older events are dropped.
pub const EVENT_LOG_CAPACITY: usize = 8;

/// One observed memory operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryEvent {
    /// A cell was allocated.
    Alloc,
    /// A cell was released.
    Release,
    /// A read or release went through a stale or invalid handle.
    InvalidAccess,
}

#[derive(Default)]
struct Counters {
    allocations: Cell<usize>,
    releases: Cell<usize>,
    invalid_accesses: Cell<usize>,
    events: RefCell<SmallVec<[MemoryEvent; EVENT_LOG_CAPACITY]>>,
}

/// Shared counter set for memory operations.
#[derive(Clone, Default)]
pub struct Tracker {
    inner: Rc<Counters>,
}

impl Tracker {
    /// Create a tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cell allocation.
    pub fn record_alloc(&self) {
        bump(&self.inner.allocations);
        self.push(MemoryEvent::Alloc);
    }

    /// Record a cell release.
    pub fn record_release(&self) {
        bump(&self.inner.releases);
        self.push(MemoryEvent::Release);
    }

    /// Record an access through a stale or invalid handle.
    pub fn record_invalid_access(&self) {
        bump(&self.inner.invalid_accesses);
        self.push(MemoryEvent::InvalidAccess);
    }

    /// Wrap `value` so its drop is recorded as a release.
    ///
    /// Records the allocation immediately.
    pub fn track<T>(&self, value: T) -> Tracked<T> {
        self.record_alloc();
        Tracked {
            value,
            tracker: self.clone(),
        }
    }

    /// Snapshot of the counters.
    pub fn report(&self) -> MemoryReport {
        MemoryReport {
            allocations: self.inner.allocations.get(),
            releases: self.inner.releases.get(),
            invalid_accesses: self.inner.invalid_accesses.get(),
        }
    }

    /// The most recent events, oldest first.
    pub fn events(&self) -> Vec<MemoryEvent> {
        self.inner.events.borrow().to_vec()
    }

    fn push(&self, event: MemoryEvent) {
        let mut events = self.inner.events.borrow_mut();
        if events.len() == EVENT_LOG_CAPACITY {
            events.remove(0);
        }
        events.push(event);
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracker").field(&self.report()).finish()
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

/// Counter snapshot taken by [`Tracker::report`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryReport {
    /// Cells allocated.
    pub allocations: usize,
    /// Cells released.
    pub releases: usize,
    /// Reads or releases through stale or invalid handles.
    pub invalid_accesses: usize,
}

impl MemoryReport {
    /// Cells allocated and never released.
    pub fn leaks(&self) -> usize {
        self.allocations.saturating_sub(self.releases)
    }

    /// No leaks and no invalid accesses.
    pub fn is_clean(&self) -> bool {
        self.leaks() == 0 && self.invalid_accesses == 0
    }
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} allocated, {} released, {} leaked, {} invalid accesses",
            self.allocations,
            self.releases,
            self.leaks(),
            self.invalid_accesses
        )
    }
}

/// A value whose drop is recorded by a [`Tracker`].
///
/// Created by [`Tracker::track`]. Dereferences to the wrapped value.
pub struct Tracked<T> {
    value: T,
    tracker: Tracker,
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.value).finish()
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.tracker.record_release();
    }
}
