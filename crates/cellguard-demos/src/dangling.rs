//! Two aliases, one release, one read too many.
//!
//! Both `pointer1` and `pointer2` are copies of the same [`RawHandle`] and
//! neither owns the cell. The cell is released through `pointer1`, after
//! which `pointer2` is stale. The final read goes through the
//! [`CellHeap`], which refuses it and records an invalid access; native
//! code would read freed memory at that point.

use std::io::Write;

use cellguard_core::{CellHeap, DemoConfig, MemoryReport, RawHandle};
use tracing::debug;

use crate::error::DemoError;

/// Marker appended to the stale read's transcript line.
pub const UNDEFINED_BEHAVIOR_NOTE: &str = "(undefined behavior, for demonstration only!)";

/// Run the dangling-alias demo, writing its transcript to `out`.
///
/// Returns the heap's memory report: one allocation, one release, and one
/// invalid access from the stale read.
pub fn run<W: Write>(config: &DemoConfig, out: &mut W) -> Result<MemoryReport, DemoError> {
    let mut heap = CellHeap::from_config(config);

    let mut pointer1: Option<RawHandle> = Some(heap.alloc(config.initial_value)?);
    // Same cell, no ownership.
    let pointer2: Option<RawHandle> = pointer1;

    if let Some(p1) = pointer1 {
        writeln!(out, "Allocation succeeded.")?;
        writeln!(out, "pointer1: {} -> {}", p1.addr(), heap.read(p1)?)?;
        if let Some(p2) = pointer2 {
            writeln!(out, "pointer2: {} -> {}", p2.addr(), heap.read(p2)?)?;
        }
    }

    if let Some(p1) = pointer1.take() {
        let value = heap.release(p1)?;
        debug!(value, "released through pointer1");
    }

    // pointer2 is now stale.
    if let Some(p2) = pointer2 {
        let shown = match heap.read(p2) {
            Ok(value) => value.to_string(),
            Err(err) => format!("<{err}>"),
        };
        writeln!(
            out,
            "pointer2 after delete: {} -> {}  {}",
            p2.addr(),
            shown,
            UNDEFINED_BEHAVIOR_NOTE
        )?;
    }

    Ok(heap.report())
}
