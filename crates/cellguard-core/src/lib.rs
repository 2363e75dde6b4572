//! Heap cells with checked aliasing and scoped ownership.
//!
//! Two ways of holding a single heap value, side by side:
//!
//! - [`CellHeap`] hands out copyable, non-owning [`RawHandle`]s. Any copy
//!   may release the cell; the other copies then go stale. Reading through
//!   a stale handle is refused and recorded rather than reading freed
//!   memory.
//! - [`OwnedCell`] is a move-only owner. Transferring ownership empties the
//!   source, and the value is released exactly once when the last owner
//!   goes out of scope.
//!
//! # Architecture
//!
//! ```text
//! CellHeap<T>
//! ├── Slot[] (generation + Option<Box<T>>)
//! ├── free list (slot reuse, retire on generation wrap)
//! └── Tracker (allocations / releases / invalid accesses)
//!
//! OwnedCell<T>
//! └── Option<Box<T>> (None after transfer)
//! ```
//!
//! Wrapping an owned value in [`Tracked`] lets the same [`Tracker`] observe
//! an `OwnedCell`'s automatic release.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
pub mod heap;
pub mod instrument;
pub mod owned;

// Public re-exports for the primary API surface.
pub use config::DemoConfig;
pub use error::CellError;
pub use handle::{Address, RawHandle};
pub use heap::CellHeap;
pub use instrument::{MemoryEvent, MemoryReport, Tracked, Tracker};
pub use owned::OwnedCell;
