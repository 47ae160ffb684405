use crate::core::pbrt::*;

use std::sync::Arc;

/// Lambertian reflector with a constant `Kd`.
pub struct MatteMaterial {
    kd: Spectrum,
}

impl MatteMaterial {
    pub fn new(kd: &Spectrum) -> Self {
        MatteMaterial { kd: *kd }
    }
}

impl Material for MatteMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        arena: &mut MemoryArena,
        _: TransportMode,
        _: bool,
    ) {
        let mut b = arena.alloc_bsdf(si, 1.0);
        if !self.kd.is_black() {
            let r: Arc<dyn BxDF> = Arc::new(LambertianReflection::new(&self.kd));
            b.add(&r);
        }
        si.bsdf = Some(Arc::new(b));
    }
}

pub fn create_matte_material(mp: &TextureParams) -> Result<Arc<dyn Material>, PbrtError> {
    let kd = mp.find_spectrum("Kd", &Spectrum::from(0.5));
    return Ok(Arc::new(MatteMaterial::new(&kd)));
}
