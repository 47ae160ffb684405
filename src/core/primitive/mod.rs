pub mod aggregate;
pub mod geometric_primitive;
pub mod primitive;

pub use aggregate::Aggregate;
pub use geometric_primitive::GeometricPrimitive;
pub use primitive::Primitive;
