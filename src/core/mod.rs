pub mod base;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod material;
pub mod memory;
pub mod param_set;
pub mod pbrt;
pub mod primitive;
pub mod reflection;
pub mod sampling;
pub mod shape;
pub mod spectrum;
