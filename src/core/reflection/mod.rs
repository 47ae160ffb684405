pub mod bsdf;
pub mod bxdf;
pub mod functions;
pub mod lambertian;

pub use bsdf::*;
pub use bxdf::*;
pub use functions::*;
pub use lambertian::*;
