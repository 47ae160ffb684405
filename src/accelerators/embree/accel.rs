use super::kernel::*;
use super::software::*;
use crate::accelerators::exhaustive::*;
use crate::core::error::*;
use crate::core::param_set::*;
use crate::core::pbrt::*;

use log::*;
use std::str::FromStr;
use std::sync::Arc;

/// What to do with primitives whose shape is not a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonTrianglePolicy {
    /// Keep them in an unaccelerated list that is still intersected.
    Fallback,
    /// Leave them out of the scene, counted and reported.
    Skip,
    /// Refuse to build the aggregate.
    Error,
}

impl FromStr for NonTrianglePolicy {
    type Err = PbrtError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fallback" => Ok(NonTrianglePolicy::Fallback),
            "skip" => Ok(NonTrianglePolicy::Skip),
            "error" => Ok(NonTrianglePolicy::Error),
            _ => {
                let msg = format!(
                    "\"nontriangles\" must be one of \"fallback\", \"skip\", \"error\", got \"{}\"",
                    s
                );
                Err(PbrtError::error(&msg))
            }
        }
    }
}

/// Aggregate that hands every triangle to an external ray tracing kernel,
/// one kernel geometry per triangle. Geometry handle `i` indexes `shapes[i]`,
/// `primitives[i]` and `views[i]`.
pub struct EmbreeAccel {
    scene: Box<dyn KernelScene>,
    kernel_name: String,
    shapes: Vec<Arc<dyn Shape>>,
    primitives: Vec<Arc<dyn Primitive>>,
    views: Vec<TriangleView>,
    fallback: Option<ExhaustiveAccel>,
    skipped: usize,
    bounds: Bounds3f,
}

impl EmbreeAccel {
    pub fn new(
        prims: &[Arc<dyn Primitive>],
        kernel: &dyn RayKernel,
        policy: NonTrianglePolicy,
    ) -> Result<Self, PbrtError> {
        let mut shapes = Vec::with_capacity(prims.len());
        let mut primitives = Vec::with_capacity(prims.len());
        let mut views = Vec::with_capacity(prims.len());
        let mut others: Vec<Arc<dyn Primitive>> = Vec::new();
        for prim in prims.iter() {
            let triangle = prim
                .get_shape()
                .and_then(|shape| shape.as_triangle().map(|view| (shape, view)));
            match triangle {
                Some((shape, view)) => {
                    shapes.push(shape);
                    primitives.push(Arc::clone(prim));
                    views.push(view);
                }
                None => others.push(Arc::clone(prim)),
            }
        }

        if !others.is_empty() && policy == NonTrianglePolicy::Error {
            let msg = format!(
                "embree: {} of {} primitives are not triangles",
                others.len(),
                prims.len()
            );
            return Err(PbrtError::error(&msg));
        }

        let mut builder = kernel.new_scene()?;
        let mut bounds = Bounds3f::default();
        for (i, view) in views.iter().enumerate() {
            let id = builder.new_triangle_mesh(1, 3)?;
            if id as usize != i {
                let msg = format!("embree: kernel returned geometry id {} for triangle {}", id, i);
                return Err(PbrtError::error(&msg));
            }
            let vertices = builder.map_vertex_buffer(id);
            for (dst, p) in vertices.iter_mut().zip(view.p.iter()) {
                *dst = [p.x, p.y, p.z, 0.0];
            }
            builder.map_index_buffer(id)[0] = [0, 1, 2];
            bounds = bounds.union(&view.world_bound());
        }
        let scene = builder.commit()?;

        let mut skipped = 0;
        let fallback = if others.is_empty() {
            None
        } else if policy == NonTrianglePolicy::Skip {
            skipped = others.len();
            warn!(
                "embree: skipped {} non-triangle primitives; they will not be visible",
                skipped
            );
            None
        } else {
            let accel = ExhaustiveAccel::new(&others);
            bounds = bounds.union(&accel.world_bound());
            info!(
                "embree: {} non-triangle primitives kept in a fallback list",
                others.len()
            );
            Some(accel)
        };

        info!(
            "embree: {} kernel, {} triangles registered",
            kernel.name(),
            scene.geometry_count()
        );

        return Ok(EmbreeAccel {
            scene,
            kernel_name: kernel.name().to_string(),
            shapes,
            primitives,
            views,
            fallback,
            skipped,
            bounds,
        });
    }

    /// Number of triangles registered with the kernel.
    pub fn geometry_count(&self) -> usize {
        return self.scene.geometry_count();
    }

    pub fn fallback_count(&self) -> usize {
        return self.fallback.as_ref().map(|f| f.prims.len()).unwrap_or(0);
    }

    pub fn skipped_count(&self) -> usize {
        return self.skipped;
    }

    pub fn kernel_name(&self) -> &str {
        return &self.kernel_name;
    }

    fn kernel_intersect(&self, r: &Ray) -> Option<SurfaceInteraction> {
        let mut kr = KernelRay::from_ray(r);
        self.scene.intersect1(&mut kr);
        if !kr.is_hit() {
            return None;
        }
        let id = kr.geom_id as usize;
        let view = &self.views[id];
        let t = kr.tfar;
        let uv = view.interpolate_uv(kr.u, kr.v);
        let mut isect = SurfaceInteraction::new(
            &r.position(t),
            &Vector3f::zero(),
            &uv,
            &(-r.d),
            &view.n,
            &view.dpdu,
            &view.dpdv,
            &Normal3f::zero(),
            &Normal3f::zero(),
            r.time,
            view.face_index,
        );
        isect.set_shape(&self.shapes[id]);
        isect.set_primitive(&self.primitives[id]);
        r.t_max.set(t);
        return Some(isect);
    }
}

impl Primitive for EmbreeAccel {
    fn world_bound(&self) -> Bounds3f {
        return self.bounds;
    }

    fn intersect(&self, r: &Ray) -> Option<SurfaceInteraction> {
        let hit = self.kernel_intersect(r);
        if let Some(fallback) = self.fallback.as_ref() {
            // r.t_max already holds the kernel hit, so only a nearer hit returns
            if let Some(isect) = fallback.intersect(r) {
                return Some(isect);
            }
        }
        return hit;
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        let mut kr = KernelRay::from_ray(r);
        if self.scene.occluded1(&mut kr) {
            return true;
        }
        if let Some(fallback) = self.fallback.as_ref() {
            return fallback.intersect_p(r);
        }
        return false;
    }
}

impl Aggregate for EmbreeAccel {}

/// Creates the kernel named by `name`.
pub fn create_kernel(
    name: &str,
    device: &str,
    max_prims_in_node: usize,
) -> Result<Box<dyn RayKernel>, PbrtError> {
    match name {
        "software" => {
            if !device.is_empty() {
                warn!("embree: \"device\" is ignored by the software kernel");
            }
            return Ok(Box::new(SoftwareKernel::new(max_prims_in_node)));
        }
        #[cfg(feature = "embree")]
        "embree" => {
            let kernel = super::ffi::EmbreeKernel::new(device)?;
            return Ok(Box::new(kernel));
        }
        #[cfg(not(feature = "embree"))]
        "embree" => {
            return Err(PbrtError::error(
                "embree: kernel \"embree\" requires building with the \"embree\" feature",
            ));
        }
        _ => {
            let msg = format!("embree: kernel \"{}\" unknown.", name);
            return Err(PbrtError::error(&msg));
        }
    }
}

fn default_kernel_name() -> &'static str {
    if cfg!(feature = "embree") {
        return "embree";
    }
    info!("embree: built without the \"embree\" feature, using the software kernel");
    return "software";
}

pub fn create_embree_accelerator(
    prims: &[Arc<dyn Primitive>],
    params: &ParamSet,
) -> Result<Arc<dyn Primitive>, PbrtError> {
    let kernel_name = match params.get_strings_ref("kernel") {
        Some(v) => v[0].clone(),
        None => default_kernel_name().to_string(),
    };
    let device = params.find_one_string("device", "");
    let max_prims_in_node = params.find_one_int("maxprimsinnode", 4).max(1) as usize;
    let policy = NonTrianglePolicy::from_str(&params.find_one_string("nontriangles", "fallback"))?;
    let kernel = create_kernel(&kernel_name, &device, max_prims_in_node)?;
    let accel = EmbreeAccel::new(prims, kernel.as_ref(), policy)?;
    return Ok(Arc::new(accel));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::*;

    fn quad_prims() -> Vec<Arc<dyn Primitive>> {
        let mut params = ParamSet::new();
        params.add_ints("indices", &[0, 1, 2, 0, 2, 3]);
        params.add_floats(
            "point P",
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
        );
        create_shapes("trianglemesh", false, &params)
            .unwrap()
            .iter()
            .map(|s| -> Arc<dyn Primitive> { Arc::new(GeometricPrimitive::new(s, &None)) })
            .collect()
    }

    #[test]
    fn test_001() {
        assert_eq!(
            NonTrianglePolicy::from_str("skip").unwrap(),
            NonTrianglePolicy::Skip
        );
        assert!(NonTrianglePolicy::from_str("ignore").is_err());
    }

    #[test]
    fn test_002() {
        let prims = quad_prims();
        let kernel = SoftwareKernel::default();
        let accel = EmbreeAccel::new(&prims, &kernel, NonTrianglePolicy::Fallback).unwrap();
        assert_eq!(accel.geometry_count(), 2);
        assert_eq!(accel.kernel_name(), "software");
        let r = Ray::new(
            &Point3f::new(0.75, 0.25, 1.0),
            &Vector3f::new(0.0, 0.0, -1.0),
            Float::INFINITY,
            0.0,
        );
        let si = accel.intersect(&r).unwrap();
        assert!((r.t_max.get() - 1.0).abs() < 1e-5);
        assert!((si.p - Point3f::new(0.75, 0.25, 0.0)).length() < 1e-5);
        assert_eq!(si.p_error, Vector3f::zero());
        let hit = si.get_primitive().unwrap();
        assert!(Arc::ptr_eq(&hit, &prims[0]));
    }

    #[test]
    fn test_003() {
        let r = create_kernel("optix", "", 4);
        assert!(r.is_err());
        #[cfg(not(feature = "embree"))]
        assert!(create_kernel("embree", "", 4).is_err());
    }
}
