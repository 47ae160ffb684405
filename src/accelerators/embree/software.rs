use super::kernel::*;
use crate::core::error::*;
use crate::core::pbrt::*;

use log::*;

/// Portable kernel: median-split BVH over all registered triangles with a
/// Möller-Trumbore triangle test.
pub struct SoftwareKernel {
    max_prims_in_node: usize,
}

impl SoftwareKernel {
    pub fn new(max_prims_in_node: usize) -> Self {
        SoftwareKernel {
            max_prims_in_node: usize::clamp(max_prims_in_node, 1, 255),
        }
    }
}

impl Default for SoftwareKernel {
    fn default() -> Self {
        Self::new(4)
    }
}

impl RayKernel for SoftwareKernel {
    fn name(&self) -> &str {
        return "software";
    }

    fn new_scene(&self) -> Result<Box<dyn KernelSceneBuilder>, PbrtError> {
        return Ok(Box::new(SoftwareSceneBuilder {
            max_prims_in_node: self.max_prims_in_node,
            meshes: Vec::new(),
        }));
    }
}

struct SoftwareMesh {
    vertices: Vec<[f32; 4]>,
    indices: Vec<[u32; 3]>,
}

pub struct SoftwareSceneBuilder {
    max_prims_in_node: usize,
    meshes: Vec<SoftwareMesh>,
}

impl KernelSceneBuilder for SoftwareSceneBuilder {
    fn new_triangle_mesh(
        &mut self,
        num_triangles: usize,
        num_vertices: usize,
    ) -> Result<GeomId, PbrtError> {
        if self.meshes.len() >= INVALID_GEOMETRY_ID as usize {
            return Err(PbrtError::error("software kernel: geometry id space exhausted"));
        }
        let id = self.meshes.len() as GeomId;
        self.meshes.push(SoftwareMesh {
            vertices: vec![[0.0; 4]; num_vertices],
            indices: vec![[0; 3]; num_triangles],
        });
        return Ok(id);
    }

    fn map_vertex_buffer(&mut self, id: GeomId) -> &mut [[f32; 4]] {
        return &mut self.meshes[id as usize].vertices;
    }

    fn map_index_buffer(&mut self, id: GeomId) -> &mut [[u32; 3]] {
        return &mut self.meshes[id as usize].indices;
    }

    fn geometry_count(&self) -> usize {
        return self.meshes.len();
    }

    fn commit(self: Box<Self>) -> Result<Box<dyn KernelScene>, PbrtError> {
        let mut triangles = Vec::new();
        for (geom_id, mesh) in self.meshes.iter().enumerate() {
            for (prim_id, idx) in mesh.indices.iter().enumerate() {
                let mut p = [Vector3f::zero(); 3];
                for k in 0..3 {
                    let v = mesh.vertices.get(idx[k] as usize).ok_or_else(|| {
                        let msg = format!(
                            "software kernel: geometry {} triangle {} references vertex {} of {}",
                            geom_id,
                            prim_id,
                            idx[k],
                            mesh.vertices.len()
                        );
                        PbrtError::error(&msg)
                    })?;
                    p[k] = Vector3f::new(v[0], v[1], v[2]);
                }
                triangles.push(KernelTriangle::new(&p, geom_id as GeomId, prim_id as u32));
            }
        }
        let n_triangles = triangles.len();
        let indices: Vec<usize> = (0..n_triangles).collect();
        let root = if indices.is_empty() {
            BvhNode::Empty
        } else {
            BvhNode::build(&triangles, indices, self.max_prims_in_node)
        };
        debug!(
            "software kernel: committed {} geometries, {} triangles",
            self.meshes.len(),
            n_triangles
        );
        return Ok(Box::new(SoftwareScene {
            geometry_count: self.meshes.len(),
            triangles,
            root,
        }));
    }
}

struct KernelTriangle {
    p0: Vector3f,
    e1: Vector3f,
    e2: Vector3f,
    bounds: Bounds3f,
    geom_id: GeomId,
    prim_id: u32,
}

impl KernelTriangle {
    fn new(p: &[Vector3f; 3], geom_id: GeomId, prim_id: u32) -> Self {
        KernelTriangle {
            p0: p[0],
            e1: p[1] - p[0],
            e2: p[2] - p[0],
            bounds: Bounds3f::from_point(&p[0]).union_p(&p[1]).union_p(&p[2]),
            geom_id,
            prim_id,
        }
    }

    /// Returns `(t, u, v)` for a hit strictly inside `[tnear, tfar]`.
    #[inline]
    fn intersect(&self, org: &Vector3f, dir: &Vector3f, tnear: f32, tfar: f32) -> Option<(f32, f32, f32)> {
        let pvec = Vector3f::cross(dir, &self.e2);
        let det = Vector3f::dot(&self.e1, &pvec);
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = *org - self.p0;
        let u = Vector3f::dot(&tvec, &pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qvec = Vector3f::cross(&tvec, &self.e1);
        let v = Vector3f::dot(dir, &qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = Vector3f::dot(&self.e2, &qvec) * inv_det;
        if t < tnear || t > tfar {
            return None;
        }
        return Some((t, u, v));
    }
}

enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bounds: Bounds3f,
    },
    Leaf {
        triangles: Vec<usize>,
        bounds: Bounds3f,
    },
    Empty,
}

/// Per-ray constants for the slab test.
struct RayBoxInfo {
    org: [Float; 3],
    idir: [Float; 3],
    sign: [usize; 3],
}

impl RayBoxInfo {
    fn new(org: &Vector3f, dir: &Vector3f) -> Self {
        RayBoxInfo {
            org: [org.x, org.y, org.z],
            idir: [dir.x.recip(), dir.y.recip(), dir.z.recip()],
            sign: [
                dir.x.is_sign_negative() as usize,
                dir.y.is_sign_negative() as usize,
                dir.z.is_sign_negative() as usize,
            ],
        }
    }

    #[inline]
    fn hit(&self, b: &Bounds3f, tnear: Float, tfar: Float) -> bool {
        let min = [b.min.x, b.min.y, b.min.z];
        let max = [b.max.x, b.max.y, b.max.z];
        return intersect_box_i(&min, &max, &self.org, &self.idir, &self.sign, tnear, tfar)
            .is_some();
    }
}

impl BvhNode {
    fn build(triangles: &[KernelTriangle], mut indices: Vec<usize>, max_prims: usize) -> Self {
        let bounds = indices
            .iter()
            .fold(Bounds3f::default(), |acc, i| acc.union(&triangles[*i].bounds));
        if indices.len() <= max_prims {
            return BvhNode::Leaf {
                triangles: indices,
                bounds,
            };
        }

        let centroid_bounds = indices.iter().fold(Bounds3f::default(), |acc, i| {
            acc.union_p(&triangles[*i].bounds.centroid())
        });
        let axis = centroid_bounds.maximum_extent();
        indices.sort_unstable_by(|a, b| {
            let ca = triangles[*a].bounds.centroid()[axis];
            let cb = triangles[*b].bounds.centroid()[axis];
            ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = indices.len() / 2;
        let right = indices.split_off(mid);
        BvhNode::Branch {
            left: Box::new(Self::build(triangles, indices, max_prims)),
            right: Box::new(Self::build(triangles, right, max_prims)),
            bounds,
        }
    }

    fn bounds(&self) -> Bounds3f {
        match self {
            BvhNode::Branch { bounds, .. } => *bounds,
            BvhNode::Leaf { bounds, .. } => *bounds,
            BvhNode::Empty => Bounds3f::default(),
        }
    }

    fn intersect(
        &self,
        triangles: &[KernelTriangle],
        info: &RayBoxInfo,
        org: &Vector3f,
        dir: &Vector3f,
        ray: &mut KernelRay,
    ) -> bool {
        match self {
            BvhNode::Empty => false,
            BvhNode::Leaf {
                triangles: ids,
                bounds,
            } => {
                if !info.hit(bounds, ray.tnear, ray.tfar) {
                    return false;
                }
                let mut hit = false;
                for i in ids.iter() {
                    let tri = &triangles[*i];
                    if let Some((t, u, v)) = tri.intersect(org, dir, ray.tnear, ray.tfar) {
                        let ng = Vector3f::cross(&tri.e1, &tri.e2);
                        ray.tfar = t;
                        ray.u = u;
                        ray.v = v;
                        ray.ng = [ng.x, ng.y, ng.z];
                        ray.geom_id = tri.geom_id;
                        ray.prim_id = tri.prim_id;
                        hit = true;
                    }
                }
                hit
            }
            BvhNode::Branch {
                left,
                right,
                bounds,
            } => {
                if !info.hit(bounds, ray.tnear, ray.tfar) {
                    return false;
                }
                // tfar shrinks on every hit, so the second child is clipped
                let hit_left = left.intersect(triangles, info, org, dir, ray);
                let hit_right = right.intersect(triangles, info, org, dir, ray);
                hit_left || hit_right
            }
        }
    }

    fn occluded(
        &self,
        triangles: &[KernelTriangle],
        info: &RayBoxInfo,
        org: &Vector3f,
        dir: &Vector3f,
        tnear: f32,
        tfar: f32,
    ) -> bool {
        match self {
            BvhNode::Empty => false,
            BvhNode::Leaf {
                triangles: ids,
                bounds,
            } => {
                info.hit(bounds, tnear, tfar)
                    && ids
                        .iter()
                        .any(|i| triangles[*i].intersect(org, dir, tnear, tfar).is_some())
            }
            BvhNode::Branch {
                left,
                right,
                bounds,
            } => {
                info.hit(bounds, tnear, tfar)
                    && (left.occluded(triangles, info, org, dir, tnear, tfar)
                        || right.occluded(triangles, info, org, dir, tnear, tfar))
            }
        }
    }
}

pub struct SoftwareScene {
    geometry_count: usize,
    triangles: Vec<KernelTriangle>,
    root: BvhNode,
}

impl KernelScene for SoftwareScene {
    fn intersect1(&self, ray: &mut KernelRay) {
        let org = Vector3f::from(ray.org);
        let dir = Vector3f::from(ray.dir);
        let info = RayBoxInfo::new(&org, &dir);
        self.root
            .intersect(&self.triangles, &info, &org, &dir, ray);
    }

    fn occluded1(&self, ray: &mut KernelRay) -> bool {
        let org = Vector3f::from(ray.org);
        let dir = Vector3f::from(ray.dir);
        let info = RayBoxInfo::new(&org, &dir);
        if self
            .root
            .occluded(&self.triangles, &info, &org, &dir, ray.tnear, ray.tfar)
        {
            ray.tfar = f32::NEG_INFINITY;
            return true;
        }
        return false;
    }

    fn geometry_count(&self) -> usize {
        return self.geometry_count;
    }

    fn bounds(&self) -> Bounds3f {
        return self.root.bounds();
    }
}
