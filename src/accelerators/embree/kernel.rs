use crate::core::error::*;
use crate::core::pbrt::*;

/// Kernel-assigned geometry handle. Handles are dense, starting at zero, in
/// registration order.
pub type GeomId = u32;

pub const INVALID_GEOMETRY_ID: GeomId = u32::MAX;

/// Single ray plus hit record in the kernel's native layout.
///
/// On a hit `tfar` holds the hit distance, `geom_id`/`prim_id` identify the
/// triangle and `(u, v)` are barycentrics such that the hit point is
/// `(1 - u - v) * p0 + u * p1 + v * p2`. `ng` is the unnormalized geometric
/// normal `cross(p1 - p0, p2 - p0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelRay {
    pub org: [f32; 3],
    pub tnear: f32,
    pub dir: [f32; 3],
    pub time: f32,
    pub tfar: f32,
    pub mask: u32,
    pub u: f32,
    pub v: f32,
    pub ng: [f32; 3],
    pub geom_id: GeomId,
    pub prim_id: u32,
}

impl KernelRay {
    pub fn new(org: &Point3f, dir: &Vector3f, tnear: Float, tfar: Float, time: Float) -> Self {
        KernelRay {
            org: [org.x, org.y, org.z],
            tnear,
            dir: [dir.x, dir.y, dir.z],
            time,
            tfar,
            mask: u32::MAX,
            u: 0.0,
            v: 0.0,
            ng: [0.0; 3],
            geom_id: INVALID_GEOMETRY_ID,
            prim_id: INVALID_GEOMETRY_ID,
        }
    }

    pub fn from_ray(r: &Ray) -> Self {
        return Self::new(&r.o, &r.d, 0.0, r.t_max.get(), r.time);
    }

    pub fn is_hit(&self) -> bool {
        return self.geom_id != INVALID_GEOMETRY_ID;
    }
}

/// A ray tracing device able to create scenes.
pub trait RayKernel {
    fn name(&self) -> &str;
    fn new_scene(&self) -> Result<Box<dyn KernelSceneBuilder>, PbrtError>;
}

/// A scene being populated. Buffers handed out by `map_*_buffer` are owned by
/// the kernel and must be filled before `commit`.
pub trait KernelSceneBuilder {
    fn new_triangle_mesh(
        &mut self,
        num_triangles: usize,
        num_vertices: usize,
    ) -> Result<GeomId, PbrtError>;
    /// xyz plus one padding float per vertex.
    fn map_vertex_buffer(&mut self, id: GeomId) -> &mut [[f32; 4]];
    fn map_index_buffer(&mut self, id: GeomId) -> &mut [[u32; 3]];
    fn geometry_count(&self) -> usize;
    fn commit(self: Box<Self>) -> Result<Box<dyn KernelScene>, PbrtError>;
}

/// A committed, immutable scene. Queries may run from many threads at once.
pub trait KernelScene: Send + Sync {
    /// Nearest hit in `[tnear, tfar]`. Fills the hit fields on success.
    fn intersect1(&self, ray: &mut KernelRay);
    /// Any hit in `[tnear, tfar]`. On occlusion `tfar` is set to `-inf`.
    fn occluded1(&self, ray: &mut KernelRay) -> bool;
    fn geometry_count(&self) -> usize;
    fn bounds(&self) -> Bounds3f;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let r = Ray::new(
            &Point3f::new(1.0, 2.0, 3.0),
            &Vector3f::new(0.0, 0.0, 1.0),
            10.0,
            0.5,
        );
        let kr = KernelRay::from_ray(&r);
        assert_eq!(kr.org, [1.0, 2.0, 3.0]);
        assert_eq!(kr.tfar, 10.0);
        assert_eq!(kr.time, 0.5);
        assert!(!kr.is_hit());
    }
}
