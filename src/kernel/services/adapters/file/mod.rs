//! File system adapters.

pub mod local;
pub mod memory;

pub use local::LocalFs;
pub use memory::{FsCall, FsOp, MemoryFs};
