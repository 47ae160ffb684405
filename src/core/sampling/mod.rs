#[allow(clippy::module_inception)]
pub mod sampling;

pub use sampling::*;
