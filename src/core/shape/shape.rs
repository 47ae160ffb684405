use crate::core::pbrt::*;

/// Flattened, world-space description of a triangle, resolved once when an
/// aggregate registers the shape with an external kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleView {
    pub p: [Point3f; 3],
    pub uv: [Point2f; 3],
    pub dpdu: Vector3f,
    pub dpdv: Vector3f,
    pub n: Normal3f,
    pub face_index: u32,
}

impl TriangleView {
    pub fn world_bound(&self) -> Bounds3f {
        return Bounds3f::from_point(&self.p[0])
            .union_p(&self.p[1])
            .union_p(&self.p[2]);
    }

    /// Interpolates the vertex uv with kernel barycentrics, where
    /// `(b1, b2)` weight the second and third vertex.
    pub fn interpolate_uv(&self, b1: Float, b2: Float) -> Point2f {
        let b0 = 1.0 - b1 - b2;
        return b0 * self.uv[0] + b1 * self.uv[1] + b2 * self.uv[2];
    }
}

pub trait Shape: Send + Sync {
    fn world_bound(&self) -> Bounds3f;
    fn intersect(&self, r: &Ray) -> Option<(Float, SurfaceInteraction)>;
    fn intersect_p(&self, r: &Ray) -> bool {
        return self.intersect(r).is_some();
    }
    fn area(&self) -> Float;

    /// Capability query used by aggregates that can only hold triangles.
    fn as_triangle(&self) -> Option<TriangleView> {
        None
    }
}
