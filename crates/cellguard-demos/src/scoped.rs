//! One owner at a time, released on scope exit.
//!
//! The cell lives in an [`OwnedCell`]. Ownership moves from `pointer1` to
//! `pointer2` with [`OwnedCell::transfer`], leaving `pointer1` empty, and
//! the cell is released when `pointer2` goes out of scope. There is no
//! explicit release call anywhere in this demo.

use std::io::Write;

use cellguard_core::{Address, CellError, DemoConfig, MemoryReport, OwnedCell, Tracked, Tracker};

use crate::error::DemoError;

/// Run the scoped-ownership demo, writing its transcript to `out`.
///
/// Returns the tracker's report, taken after the owning handles have gone
/// out of scope.
pub fn run<W: Write>(config: &DemoConfig, out: &mut W) -> Result<MemoryReport, DemoError> {
    let tracker = Tracker::new();
    {
        let mut pointer1 = OwnedCell::new(tracker.track(config.initial_value));
        let (addr, value) = describe(&pointer1)?;
        writeln!(out, "pointer1 -> {addr} : value = {value}")?;

        let pointer2 = pointer1.transfer();

        if pointer1.is_empty() {
            writeln!(out, "pointer1 is now null after move")?;
        }

        let (addr, value) = describe(&pointer2)?;
        writeln!(out, "pointer2 -> {addr} : value = {value}")?;
    }
    Ok(tracker.report())
}

fn describe(cell: &OwnedCell<Tracked<i32>>) -> Result<(Address, i32), CellError> {
    let value = cell.try_get()?;
    Ok((Address::of(value), **value))
}
