pub mod constants;

pub use crate::core::pbrt::types::*;
pub use constants::*;
