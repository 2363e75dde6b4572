//! Raw cell handles and display addresses.
//!
//! A [`RawHandle`] names a cell inside a [`CellHeap`](crate::heap::CellHeap)
//! without owning it. It is generation-scoped: the `generation` field allows
//! an O(1) staleness check against the slot it names, and copying a handle
//! produces an alias that goes stale together with the original.

use std::fmt;

/// Heap address of a cell, kept for display only.
///
/// Never converted back into a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address(usize);

impl Address {
    /// Address of the value behind `value`.
    pub fn of<T>(value: &T) -> Self {
        Self(value as *const T as usize)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Non-owning reference to a cell in a [`CellHeap`](crate::heap::CellHeap).
///
/// `Copy` on purpose: every copy is an alias with no say over the cell's
/// lifetime. Resolving a handle after its cell has been released fails with
/// [`CellError::StaleHandle`](crate::error::CellError::StaleHandle).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct RawHandle {
    /// Slot index within the heap.
    pub(crate) slot: u32,
    /// Slot generation when this cell was allocated.
    pub(crate) generation: u32,
    /// Where the cell lived when it was allocated.
    pub(crate) addr: Address,
}

impl RawHandle {
    pub(crate) fn new(slot: u32, generation: u32, addr: Address) -> Self {
        Self {
            slot,
            generation,
            addr,
        }
    }

    /// Slot index this handle points into.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// The generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Address of the cell at allocation time.
    ///
    /// Still printable after release, like a dangling pointer's value.
    pub fn addr(&self) -> Address {
        self.addr
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawHandle(slot={}, gen={}, addr={})",
            self.slot, self.generation, self.addr
        )
    }
}
