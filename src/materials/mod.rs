pub mod alta;
pub mod create_material;
pub mod matte;

pub use alta::*;
pub use create_material::*;
pub use matte::*;
