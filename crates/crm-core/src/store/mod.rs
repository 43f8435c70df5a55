// # Store Implementations
//
// This module provides implementations of the repository traits.
// Currently in-memory only; a relational implementation would slot in
// behind the same traits.

pub mod memory;

pub use memory::MemoryStore;
