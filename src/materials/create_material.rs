use super::alta::*;
use super::matte::*;
use crate::core::pbrt::*;

use log::*;
use std::sync::Arc;

pub fn create_material(name: &str, mp: &TextureParams) -> Result<Arc<dyn Material>, PbrtError> {
    match name {
        "alta" => {
            return create_alta_material(mp);
        }
        "matte" => {
            return create_matte_material(mp);
        }
        "" | "none" => {
            return Err(PbrtError::warning("Material \"none\" has no BSDF."));
        }
        _ => {
            let msg = format!("Material \"{}\" unknown.", name);
            warn!("{}", msg);
            return Err(PbrtError::warning(&msg));
        }
    }
}
