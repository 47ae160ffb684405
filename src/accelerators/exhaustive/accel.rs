use crate::core::pbrt::*;

use std::sync::Arc;

fn get_bounds(prims: &[Arc<dyn Primitive>]) -> Bounds3f {
    return prims
        .iter()
        .fold(Bounds3f::default(), |b, p| b.union(&p.world_bound()));
}

/// Linear list of primitives, every ray is tested against all of them.
pub struct ExhaustiveAccel {
    pub prims: Vec<Arc<dyn Primitive>>,
    pub bounds: Bounds3f,
}

impl ExhaustiveAccel {
    pub fn new(prims: &[Arc<dyn Primitive>]) -> Self {
        let bounds = get_bounds(prims);
        let prims = prims.to_vec();
        ExhaustiveAccel { prims, bounds }
    }
}

impl Primitive for ExhaustiveAccel {
    fn world_bound(&self) -> Bounds3f {
        return self.bounds;
    }

    fn intersect(&self, r: &Ray) -> Option<SurfaceInteraction> {
        self.bounds.intersect_p(r)?;
        let mut opt_isect = None;
        for it in self.prims.iter() {
            let prim = it.as_ref();
            // each hit shrinks r.t_max, so the last hit is the nearest
            if let Some(mut isect) = prim.intersect(r) {
                if prim.is_geometric() {
                    isect.set_primitive(it);
                }
                opt_isect = Some(isect);
            }
        }
        return opt_isect;
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        if self.bounds.intersect_p(r).is_none() {
            return false;
        }
        return self.prims.iter().any(|p| p.intersect_p(r));
    }
}

impl Aggregate for ExhaustiveAccel {}

pub fn create_exhaustive_accelerator(
    prims: &[Arc<dyn Primitive>],
    _: &ParamSet,
) -> Result<Arc<dyn Primitive>, PbrtError> {
    return Ok(Arc::new(ExhaustiveAccel::new(prims)));
}
