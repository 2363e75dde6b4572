//! Dangling-pointer and unique-pointer teaching programs.
//!
//! Each demo is a library routine that writes its transcript to any
//! [`std::io::Write`] and returns the [`MemoryReport`] for the run, so the
//! binaries and the tests drive exactly the same code:
//!
//! - [`dangling::run`]: two non-owning aliases, release through one, read
//!   through the other.
//! - [`scoped::run`]: a move-only owner, ownership transfer, automatic
//!   release.
//!
//! [`MemoryReport`]: cellguard_core::MemoryReport

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dangling;
pub mod error;
pub mod scoped;

pub use error::DemoError;

use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// Stdout carries only the demo transcript. Calling this more than once is
/// harmless; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
