#[allow(clippy::module_inception)]
pub mod shape;

pub use shape::*;
