pub mod param_set;
pub mod texture_params;
pub mod wellknown_params;

pub use param_set::ParamSet;
pub use texture_params::TextureParams;
