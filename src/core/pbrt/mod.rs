pub mod types;

pub use crate::core::base::*;
pub use crate::core::error::*;
pub use crate::core::geometry::*;
pub use crate::core::interaction::*;
pub use crate::core::material::*;
pub use crate::core::memory::*;
pub use crate::core::param_set::*;
pub use crate::core::primitive::*;
pub use crate::core::reflection::*;
pub use crate::core::sampling::*;
pub use crate::core::shape::*;
pub use crate::core::spectrum::*;
pub use types::*;
