#[allow(clippy::module_inception)]
pub mod ray;

pub use ray::*;
