//! Cell-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur when resolving or releasing a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellError {
    /// The heap has no free slot and may not create another.
    CapacityExceeded {
        /// Number of slots that would have been needed.
        requested: usize,
        /// Maximum number of slots the heap may hold.
        capacity: usize,
    },
    /// A [`RawHandle`](crate::handle::RawHandle) whose cell has already
    /// been released.
    StaleHandle {
        /// The generation encoded in the handle.
        handle_generation: u32,
        /// The slot's current generation.
        slot_generation: u32,
    },
    /// A handle naming a slot this heap never created.
    InvalidHandle {
        /// The slot index encoded in the handle.
        slot: u32,
    },
    /// Read through an owning handle that no longer owns anything.
    Empty,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "cell heap capacity exceeded: requested {requested} slots, capacity {capacity} slots"
                )
            }
            Self::StaleHandle {
                handle_generation,
                slot_generation,
            } => {
                write!(
                    f,
                    "stale handle: generation {handle_generation}, slot now at generation {slot_generation}"
                )
            }
            Self::InvalidHandle { slot } => {
                write!(f, "invalid handle: slot {slot} was never allocated")
            }
            Self::Empty => write!(f, "owning handle is empty"),
        }
    }
}

impl Error for CellError {}
