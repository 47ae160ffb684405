pub mod data;
pub mod file;
pub mod function;
pub mod function_file;
pub mod interpolant;
pub mod merl;
pub mod model;
pub mod params;
pub mod plugins_manager;

pub use data::*;
pub use function::*;
pub use function_file::*;
pub use interpolant::*;
pub use merl::*;
pub use model::*;
pub use params::*;
pub use plugins_manager::*;
