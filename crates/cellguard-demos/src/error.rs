//! Errors surfaced by the demo routines.

use std::error::Error;
use std::fmt;
use std::io;

use cellguard_core::CellError;

/// Anything that can stop a demo before it finishes printing.
#[derive(Debug)]
pub enum DemoError {
    /// Writing a transcript line failed.
    Io(io::Error),
    /// A cell operation the demo relies on failed.
    Cell(CellError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to write demo output: {err}"),
            Self::Cell(err) => write!(f, "cell operation failed: {err}"),
        }
    }
}

impl Error for DemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Cell(err) => Some(err),
        }
    }
}

impl From<io::Error> for DemoError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<CellError> for DemoError {
    fn from(err: CellError) -> Self {
        Self::Cell(err)
    }
}
