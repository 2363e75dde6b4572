//! Slot + generation table of heap cells addressed by [`RawHandle`]s.
//!
//! This is the memory-safe stand-in for `new`/`delete` on raw pointers.
//! Handles can be copied freely and released through any copy; every other
//! copy then goes stale. Resolving a stale handle is refused with
//! [`CellError::StaleHandle`] and recorded by the heap's [`Tracker`]
//! instead of reading freed memory. Double release is refused the same way.

use tracing::{debug, warn};

use crate::config::DemoConfig;
use crate::error::CellError;
use crate::handle::{Address, RawHandle};
use crate::instrument::{MemoryReport, Tracker};

struct Slot<T> {
    generation: u32,
    data: Option<Box<T>>,
}

/// Table of boxed cells with generation-checked handles.
///
/// Reuses slots via a free list. Generation counters increment on release,
/// making stale handles detectable without UB.
///
/// Cells still live when the heap is dropped are freed with it but are not
/// counted as released, so the tracker reports them as leaks.
pub struct CellHeap<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    /// Number of slots currently holding a cell.
    live: usize,
    capacity: u32,
    tracker: Tracker,
}

impl<T> CellHeap<T> {
    /// Create an empty heap that may hold at most `capacity` slots.
    pub fn new(capacity: u32) -> Self {
        Self::with_tracker(capacity, Tracker::new())
    }

    /// Create an empty heap reporting into an existing tracker.
    pub fn with_tracker(capacity: u32, tracker: Tracker) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            capacity,
            tracker,
        }
    }

    /// Create an empty heap sized by `config`.
    pub fn from_config(config: &DemoConfig) -> Self {
        Self::new(config.heap_capacity)
    }

    /// Allocate a cell holding `value` and return a handle to it.
    ///
    /// Returns `Err(CellError::CapacityExceeded)` if no slot is free and
    /// the heap already holds `capacity` slots.
    pub fn alloc(&mut self, value: T) -> Result<RawHandle, CellError> {
        let boxed = Box::new(value);
        let addr = Address::of(&*boxed);

        let slot_idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx as usize].data = Some(boxed);
                idx
            }
            None => {
                if self.slots.len() >= self.capacity as usize {
                    return Err(CellError::CapacityExceeded {
                        requested: self.slots.len() + 1,
                        capacity: self.capacity as usize,
                    });
                }
                self.slots.push(Slot {
                    generation: 0,
                    data: Some(boxed),
                });
                (self.slots.len() - 1) as u32
            }
        };

        let handle = RawHandle::new(slot_idx, self.slots[slot_idx as usize].generation, addr);
        self.live += 1;
        self.tracker.record_alloc();
        debug!(slot = handle.slot, generation = handle.generation, %addr, "cell allocated");
        Ok(handle)
    }

    /// Resolve a handle to its cell.
    ///
    /// A stale or invalid handle is refused and recorded as an invalid
    /// access; the freed cell is never touched.
    pub fn read(&self, handle: RawHandle) -> Result<&T, CellError> {
        match self.live_slot(handle) {
            Ok(slot) => match slot.data.as_deref() {
                Some(value) => Ok(value),
                None => Err(self.refuse(handle, slot_stale(handle, slot))),
            },
            Err(err) => Err(self.refuse(handle, err)),
        }
    }

    /// Release the cell behind `handle`, returning its value.
    ///
    /// Increments the slot generation and returns the slot to the free list.
    /// If the generation wraps to zero the slot is retired instead, so a
    /// handle from the first epoch can never resolve to a later cell.
    /// Releasing through a stale handle is refused and recorded.
    pub fn release(&mut self, handle: RawHandle) -> Result<T, CellError> {
        if let Err(err) = self.live_slot(handle) {
            return Err(self.refuse(handle, err));
        }
        let slot = &mut self.slots[handle.slot as usize];
        let Some(boxed) = slot.data.take() else {
            let err = slot_stale(handle, slot);
            return Err(self.refuse(handle, err));
        };
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(handle.slot);
        }
        self.live -= 1;
        self.tracker.record_release();
        debug!(slot = handle.slot, generation = handle.generation, addr = %handle.addr, "cell released");
        Ok(*boxed)
    }

    /// Whether `handle` still names a live cell. Does not record anything.
    pub fn is_live(&self, handle: RawHandle) -> bool {
        self.live_slot(handle)
            .map(|slot| slot.data.is_some())
            .unwrap_or(false)
    }

    /// Number of cells currently allocated.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Maximum number of slots.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// The tracker this heap reports into.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Snapshot of the tracker's counters.
    pub fn report(&self) -> MemoryReport {
        self.tracker.report()
    }

    fn live_slot(&self, handle: RawHandle) -> Result<&Slot<T>, CellError> {
        let slot = self
            .slots
            .get(handle.slot as usize)
            .ok_or(CellError::InvalidHandle { slot: handle.slot })?;
        if slot.generation != handle.generation {
            return Err(slot_stale(handle, slot));
        }
        Ok(slot)
    }

    fn refuse(&self, handle: RawHandle, err: CellError) -> CellError {
        self.tracker.record_invalid_access();
        warn!(slot = handle.slot, generation = handle.generation, addr = %handle.addr, error = %err, "invalid cell access");
        err
    }
}

fn slot_stale<T>(handle: RawHandle, slot: &Slot<T>) -> CellError {
    CellError::StaleHandle {
        handle_generation: handle.generation,
        slot_generation: slot.generation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{MemoryEvent, EVENT_LOG_CAPACITY};

    #[test]
    fn alloc_read_round_trip() {
        let mut heap = CellHeap::new(4);
        let h = heap.alloc(67i32).unwrap();
        assert_eq!(heap.read(h), Ok(&67));
        assert_eq!(heap.live_count(), 1);
    }

    #[test]
    fn alias_reads_same_cell() {
        let mut heap = CellHeap::new(4);
        let pointer1 = heap.alloc(67i32).unwrap();
        let pointer2 = pointer1;
        assert_eq!(pointer1.addr(), pointer2.addr());
        assert_eq!(heap.read(pointer1), heap.read(pointer2));
        assert_eq!(Address::of(heap.read(pointer2).unwrap()), pointer2.addr());
    }

    #[test]
    fn release_returns_value() {
        let mut heap = CellHeap::new(4);
        let h = heap.alloc(99i32).unwrap();
        assert_eq!(heap.release(h), Ok(99));
        assert!(!heap.is_live(h));
        assert_eq!(heap.live_count(), 0);
    }

    #[test]
    fn stale_alias_read_is_refused_and_recorded() {
        let mut heap = CellHeap::new(4);
        let pointer1 = heap.alloc(67i32).unwrap();
        let pointer2 = pointer1;
        heap.release(pointer1).unwrap();

        assert_eq!(
            heap.read(pointer2),
            Err(CellError::StaleHandle {
                handle_generation: 0,
                slot_generation: 1,
            })
        );
        let report = heap.report();
        assert_eq!(report.invalid_accesses, 1);
        assert_eq!(report.leaks(), 0);
        assert_eq!(
            heap.tracker().events(),
            vec![
                MemoryEvent::Alloc,
                MemoryEvent::Release,
                MemoryEvent::InvalidAccess
            ]
        );
    }

    #[test]
    fn double_release_is_refused() {
        let mut heap = CellHeap::new(4);
        let h = heap.alloc(1i32).unwrap();
        assert_eq!(heap.release(h), Ok(1));
        assert!(matches!(
            heap.release(h),
            Err(CellError::StaleHandle { .. })
        ));
        assert_eq!(heap.report().releases, 1);
        assert_eq!(heap.report().invalid_accesses, 1);
    }

    #[test]
    fn free_list_reuses_slots() {
        let mut heap = CellHeap::new(4);
        let h1 = heap.alloc(1i32).unwrap();
        heap.release(h1).unwrap();
        let h2 = heap.alloc(2i32).unwrap();
        // Slot reused, but different generation.
        assert_eq!(h1.slot(), h2.slot());
        assert_eq!(h2.generation(), h1.generation() + 1);
        assert_eq!(heap.read(h2), Ok(&2));
        // Old handle is stale even though the slot is occupied again.
        assert!(heap.read(h1).is_err());
    }

    #[test]
    fn never_allocated_slot_is_invalid() {
        let mut heap: CellHeap<i32> = CellHeap::new(4);
        let h = heap.alloc(0).unwrap();
        let bogus = RawHandle::new(999, 0, h.addr());
        assert_eq!(heap.read(bogus), Err(CellError::InvalidHandle { slot: 999 }));
        assert_eq!(heap.report().invalid_accesses, 1);
    }

    #[test]
    fn capacity_exceeded() {
        let mut heap = CellHeap::new(2);
        heap.alloc(1i32).unwrap();
        heap.alloc(2i32).unwrap();
        assert_eq!(
            heap.alloc(3),
            Err(CellError::CapacityExceeded {
                requested: 3,
                capacity: 2,
            })
        );
        assert_eq!(heap.report().allocations, 2);
    }

    #[test]
    fn released_slot_frees_capacity() {
        let mut heap = CellHeap::new(1);
        let h = heap.alloc(1i32).unwrap();
        heap.release(h).unwrap();
        assert!(heap.alloc(2).is_ok());
    }

    #[test]
    fn generation_exhaustion_retires_slot() {
        let mut heap = CellHeap::new(4);
        let h = heap.alloc(1i32).unwrap();
        heap.release(h).unwrap();

        // Fast-forward slot 0 to the last generation before wraparound.
        heap.slots[0].generation = u32::MAX;
        let h2 = heap.alloc(2i32).unwrap();
        assert_eq!(h2.generation(), u32::MAX);

        // Release wraps generation to 0; slot must NOT be recycled.
        heap.release(h2).unwrap();
        assert_eq!(heap.slots[0].generation, 0);
        assert!(!heap.free_list.contains(&0));

        // First-epoch handle must not resolve.
        assert!(matches!(heap.read(h), Err(CellError::StaleHandle { .. })));

        let h3 = heap.alloc(3i32).unwrap();
        assert_ne!(h3.slot(), 0, "retired slot must not be reused");
    }

    #[test]
    fn live_count_tracks_alloc_and_release() {
        let mut heap = CellHeap::new(4);
        let h1 = heap.alloc(1i32).unwrap();
        let h2 = heap.alloc(2i32).unwrap();
        assert_eq!(heap.live_count(), 2);
        heap.release(h1).unwrap();
        assert_eq!(heap.live_count(), 1);

        // Refused operations leave the count alone.
        assert!(heap.release(h1).is_err());
        assert!(heap.alloc(3).is_ok());
        assert_eq!(heap.live_count(), 2);
        heap.release(h2).unwrap();
        assert_eq!(heap.live_count(), 1);
    }

    #[test]
    fn capacity_error_does_not_count_as_live() {
        let mut heap = CellHeap::new(1);
        let _h = heap.alloc(1i32).unwrap();
        assert!(heap.alloc(2).is_err());
        assert_eq!(heap.live_count(), 1);
    }

    #[test]
    fn event_log_stays_bounded_over_many_cycles() {
        let mut heap = CellHeap::new(1);
        for i in 0..200_000 {
            let h = heap.alloc(i).unwrap();
            heap.release(h).unwrap();
        }
        assert!(heap.tracker().events().len() <= EVENT_LOG_CAPACITY);
        assert_eq!(heap.report().allocations, 200_000);
        assert_eq!(heap.report().leaks(), 0);
        assert_eq!(heap.live_count(), 0);
    }

    #[test]
    fn is_live_records_nothing() {
        let mut heap = CellHeap::new(4);
        let h = heap.alloc(1i32).unwrap();
        heap.release(h).unwrap();
        assert!(!heap.is_live(h));
        assert_eq!(heap.report().invalid_accesses, 0);
    }

    #[test]
    fn from_config_uses_heap_capacity() {
        let config = DemoConfig {
            initial_value: 1,
            heap_capacity: 3,
        };
        let heap: CellHeap<i32> = CellHeap::from_config(&config);
        assert_eq!(heap.capacity(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn released_handles_never_resolve(
                ops in proptest::collection::vec(any::<bool>(), 1..64),
            ) {
                let mut heap = CellHeap::new(64);
                let mut live = Vec::new();
                let mut released = Vec::new();
                for (i, alloc) in ops.iter().enumerate() {
                    if *alloc || live.is_empty() {
                        live.push(heap.alloc(i).unwrap());
                    } else {
                        let h = live.swap_remove(i % live.len());
                        heap.release(h).unwrap();
                        released.push(h);
                    }
                }
                for h in &released {
                    prop_assert!(heap.read(*h).is_err());
                }
                for h in &live {
                    prop_assert!(heap.read(*h).is_ok());
                }
                prop_assert_eq!(heap.live_count(), live.len());
                prop_assert_eq!(heap.report().invalid_accesses, released.len());
            }

            #[test]
            fn leaks_equal_live_count(
                values in proptest::collection::vec(any::<i32>(), 1..32),
                release_mask in proptest::collection::vec(any::<bool>(), 32),
            ) {
                let mut heap = CellHeap::new(32);
                let handles: Vec<_> = values.iter().map(|&v| heap.alloc(v).unwrap()).collect();
                for (h, release) in handles.iter().zip(&release_mask) {
                    if *release {
                        heap.release(*h).unwrap();
                    }
                }
                prop_assert_eq!(heap.report().leaks(), heap.live_count());
                prop_assert!(heap.report().invalid_accesses == 0);
            }
        }
    }
}
