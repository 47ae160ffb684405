use super::primitive::Primitive;
use crate::core::pbrt::*;

use std::sync::Arc;

pub struct GeometricPrimitive {
    pub shape: Arc<dyn Shape>,
    pub material: Option<Arc<dyn Material>>,
}

impl GeometricPrimitive {
    pub fn new(shape: &Arc<dyn Shape>, material: &Option<Arc<dyn Material>>) -> Self {
        GeometricPrimitive {
            shape: Arc::clone(shape),
            material: material.clone(),
        }
    }
}

impl Primitive for GeometricPrimitive {
    fn world_bound(&self) -> Bounds3f {
        return self.shape.world_bound();
    }

    fn intersect(&self, r: &Ray) -> Option<SurfaceInteraction> {
        let (t_hit, mut isect) = self.shape.intersect(r)?;
        r.t_max.set(t_hit);
        isect.set_shape(&self.shape);
        return Some(isect);
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        return self.shape.intersect_p(r);
    }

    fn get_material(&self) -> Option<Arc<dyn Material>> {
        return self.material.clone();
    }

    fn get_shape(&self) -> Option<Arc<dyn Shape>> {
        return Some(Arc::clone(&self.shape));
    }

    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        arena: &mut MemoryArena,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) {
        if let Some(mat) = self.material.as_ref() {
            mat.compute_scattering_functions(si, arena, mode, allow_multiple_lobes);
        }
    }

    fn is_geometric(&self) -> bool {
        return true;
    }
}
