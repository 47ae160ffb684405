use super::embree::*;
use super::exhaustive::*;
use crate::core::error::*;
use crate::core::param_set::*;
use crate::core::primitive::*;

use std::sync::Arc;

pub fn create_accelerator(
    name: &str,
    prims: &[Arc<dyn Primitive>],
    params: &ParamSet,
) -> Result<Arc<dyn Primitive>, PbrtError> {
    if prims.is_empty() {
        return Err(PbrtError::error("No primitives given to the accelerator."));
    }
    match name {
        "embree" => create_embree_accelerator(prims, params),
        "exhaustive" => create_exhaustive_accelerator(prims, params),
        _ => {
            return Err(PbrtError::warning(&format!(
                "Accelerator \"{}\" unknown.",
                name
            )));
        }
    }
}
