pub mod accel;
#[cfg(feature = "embree")]
pub mod ffi;
pub mod kernel;
pub mod software;

pub use accel::*;
#[cfg(feature = "embree")]
pub use ffi::*;
pub use kernel::*;
pub use software::*;
