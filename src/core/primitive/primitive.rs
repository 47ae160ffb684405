use crate::core::pbrt::*;

use std::sync::Arc;

pub trait Primitive: Send + Sync {
    fn world_bound(&self) -> Bounds3f;
    fn intersect(&self, r: &Ray) -> Option<SurfaceInteraction>;
    fn intersect_p(&self, r: &Ray) -> bool;
    fn get_material(&self) -> Option<Arc<dyn Material>> {
        None
    }
    fn get_shape(&self) -> Option<Arc<dyn Shape>> {
        None
    }
    fn compute_scattering_functions(
        &self,
        _si: &mut SurfaceInteraction,
        _arena: &mut MemoryArena,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
    }

    fn is_geometric(&self) -> bool {
        return false;
    }
}
