//! Scoped, move-only owning cells.
//!
//! An [`OwnedCell`] is the sole owner of one boxed value. Ownership moves
//! with [`OwnedCell::transfer`], which leaves the source empty, and the
//! value is released exactly once when the current owner is dropped.

use std::fmt;

use tracing::debug;

use crate::error::CellError;
use crate::handle::Address;

/// Single-owner heap cell that releases its value on drop.
///
/// Not `Clone`: at most one `OwnedCell` holds a given cell at any time.
pub struct OwnedCell<T> {
    cell: Option<Box<T>>,
}

impl<T> OwnedCell<T> {
    /// Allocate `value` on the heap and take ownership of it.
    pub fn new(value: T) -> Self {
        let cell = Box::new(value);
        debug!(addr = %Address::of(&*cell), "owned cell allocated");
        Self { cell: Some(cell) }
    }

    /// An owning handle that owns nothing.
    pub const fn empty() -> Self {
        Self { cell: None }
    }

    /// Borrow the owned value, or `None` if this handle is empty.
    pub fn get(&self) -> Option<&T> {
        self.cell.as_deref()
    }

    /// Borrow the owned value, failing with [`CellError::Empty`] if this
    /// handle no longer owns anything.
    pub fn try_get(&self) -> Result<&T, CellError> {
        self.get().ok_or(CellError::Empty)
    }

    /// Heap address of the owned value.
    pub fn addr(&self) -> Option<Address> {
        self.get().map(Address::of)
    }

    /// Whether this handle owns nothing.
    pub fn is_empty(&self) -> bool {
        self.cell.is_none()
    }

    /// Move ownership into a new handle, leaving `self` empty.
    ///
    /// The value stays where it is on the heap; only the owner changes.
    /// Transferring from an empty handle yields another empty handle.
    #[must_use = "dropping the returned handle releases the cell immediately"]
    pub fn transfer(&mut self) -> OwnedCell<T> {
        let cell = self.cell.take();
        if let Some(cell) = &cell {
            debug!(addr = %Address::of(&**cell), "owned cell transferred");
        }
        OwnedCell { cell }
    }

    /// Release the owned value now, leaving this handle empty.
    pub fn reset(&mut self) {
        if let Some(cell) = self.cell.take() {
            debug!(addr = %Address::of(&*cell), "owned cell released");
        }
    }
}

impl<T> Drop for OwnedCell<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: fmt::Debug> fmt::Debug for OwnedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cell {
            Some(cell) => f.debug_tuple("OwnedCell").field(cell).finish(),
            None => f.write_str("OwnedCell(empty)"),
        }
    }
}
