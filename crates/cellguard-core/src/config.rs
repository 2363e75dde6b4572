//! Demo configuration parameters.

/// Configuration shared by both demo programs.
///
/// The binaries always run with [`DemoConfig::default`]; tests construct
/// other values to check that nothing depends on the literal 67.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoConfig {
    /// Value stored in the cell at allocation.
    ///
    /// Default: 67.
    pub initial_value: i32,

    /// Maximum number of slots the [`CellHeap`](crate::heap::CellHeap) may
    /// create, counting retired slots.
    ///
    /// Default: 16. The demos only ever need one.
    pub heap_capacity: u32,
}

impl DemoConfig {
    /// Default initial cell value.
    pub const DEFAULT_INITIAL_VALUE: i32 = 67;

    /// Default slot capacity of the cell heap.
    pub const DEFAULT_HEAP_CAPACITY: u32 = 16;

    /// Create a config storing `initial_value`, with default capacity.
    pub fn new(initial_value: i32) -> Self {
        Self {
            initial_value,
            heap_capacity: Self::DEFAULT_HEAP_CAPACITY,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_VALUE)
    }
}
