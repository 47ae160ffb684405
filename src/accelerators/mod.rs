pub mod create_accelerator;
pub mod embree;
pub mod exhaustive;

pub use create_accelerator::*;
pub use embree::*;
pub use exhaustive::*;
