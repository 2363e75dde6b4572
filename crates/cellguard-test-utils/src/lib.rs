//! Test utilities for cellguard development.
//!
//! Provides a [`DropCounter`] for checking release counts without the
//! crate's own instrumentation, and [`capture`] for running a demo against
//! an in-memory writer and splitting its output into lines.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;
use std::rc::Rc;

/// Counts how many [`Droppable`] values made from it have been dropped.
#[derive(Clone, Default)]
pub struct DropCounter {
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a value that bumps this counter when dropped.
    pub fn droppable<T>(&self, value: T) -> Droppable<T> {
        Droppable {
            value,
            drops: Rc::clone(&self.drops),
        }
    }

    pub fn drops(&self) -> usize {
        self.drops.get()
    }
}

/// Value produced by [`DropCounter::droppable`].
pub struct Droppable<T> {
    pub value: T,
    drops: Rc<Cell<usize>>,
}

impl<T> Drop for Droppable<T> {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Run `f` against an in-memory writer and return its result and the
/// written lines.
///
/// # Panics
///
/// Panics if the output is not valid UTF-8.
pub fn capture<R>(f: impl FnOnce(&mut Vec<u8>) -> R) -> (R, Vec<String>) {
    let mut buf = Vec::new();
    let result = f(&mut buf);
    let text = String::from_utf8(buf).expect("demo output is UTF-8");
    let lines = text.lines().map(str::to_owned).collect();
    (result, lines)
}

/// Split `"<prefix><addr><sep><value>"` into `(addr, value)`.
///
/// Returns `None` if the line does not start with `prefix` or lacks `sep`.
pub fn split_line<'a>(line: &'a str, prefix: &str, sep: &str) -> Option<(&'a str, &'a str)> {
    let rest = line.strip_prefix(prefix)?;
    let (addr, value) = rest.split_once(sep)?;
    Some((addr.trim(), value.trim()))
}
