use super::primitive::Primitive;

/// A primitive that holds other primitives and resolves hits back to them.
pub trait Aggregate: Primitive {}
