pub mod accelerators;
pub mod alta;
pub mod core;
pub mod materials;
pub mod shapes;
