pub mod create_shape;
pub mod plymesh;
pub mod sphere;
pub mod triangle;

pub use create_shape::*;
pub use plymesh::*;
pub use sphere::*;
pub use triangle::*;
