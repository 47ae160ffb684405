pub mod memory_arena;

pub use memory_arena::*;
