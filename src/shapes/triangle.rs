use crate::core::error::*;
use crate::core::geometry::*;
use crate::core::interaction::*;
use crate::core::param_set::*;
use crate::core::pbrt::*;
use crate::core::shape::*;

use std::sync::Arc;

/// Vertex data shared by every triangle of one mesh. Positions and normals are
/// already in world space.
pub struct TriangleMesh {
    pub reverse_orientation: bool,
    pub two_sided: bool,
    pub p: Vec<Point3f>,
    pub n: Vec<Normal3f>,
    pub uv: Vec<Point2f>,
}

const MACHINE_EPSILON: Float = Float::EPSILON * 0.5;
const GAMMA2: Float = (2.0 * MACHINE_EPSILON) / (1.0 - (2.0 * MACHINE_EPSILON));
const GAMMA3: Float = (3.0 * MACHINE_EPSILON) / (1.0 - (3.0 * MACHINE_EPSILON));
const GAMMA5: Float = (5.0 * MACHINE_EPSILON) / (1.0 - (5.0 * MACHINE_EPSILON));
const GAMMA7: Float = (7.0 * MACHINE_EPSILON) / (1.0 - (7.0 * MACHINE_EPSILON));
const TRI: [usize; 4] = [0, 1, 2, 0];

impl TriangleMesh {
    pub fn new(
        reverse_orientation: bool,
        two_sided: bool,
        p: Vec<Point3f>,
        n: Vec<Normal3f>,
        uv: Vec<Point2f>,
    ) -> Self {
        TriangleMesh {
            reverse_orientation,
            two_sided,
            p,
            n,
            uv,
        }
    }
}

pub struct Triangle {
    pub mesh: Arc<TriangleMesh>,
    pub v: [u32; 3],
    pub face_index: usize,
}

impl Triangle {
    pub fn new(mesh: &Arc<TriangleMesh>, v: &[u32; 3], face_index: usize) -> Self {
        Triangle {
            mesh: Arc::clone(mesh),
            v: *v,
            face_index,
        }
    }

    fn vertices(&self) -> [Point3f; 3] {
        let mesh = self.mesh.as_ref();
        return [
            mesh.p[self.v[0] as usize],
            mesh.p[self.v[1] as usize],
            mesh.p[self.v[2] as usize],
        ];
    }

    pub fn get_uvs(&self) -> [Point2f; 3] {
        let mesh = self.mesh.as_ref();
        if !mesh.uv.is_empty() {
            return [
                mesh.uv[self.v[0] as usize],
                mesh.uv[self.v[1] as usize],
                mesh.uv[self.v[2] as usize],
            ];
        } else {
            return [
                Point2f::new(0.0, 0.0),
                Point2f::new(1.0, 0.0),
                Point2f::new(1.0, 1.0),
            ];
        }
    }

    /// Geometric normal, flipped for reversed meshes.
    pub fn geometric_normal(&self) -> Option<Normal3f> {
        let [p0, p1, p2] = self.vertices();
        let n = Vector3f::cross(&(p0 - p2), &(p1 - p2));
        if n.length_squared() <= 0.0 {
            return None;
        }
        let n = n.normalize();
        if self.mesh.reverse_orientation {
            return Some(-n);
        }
        return Some(n);
    }

    pub fn get_dpdu_dpdv(&self, p: &[Point3f; 3]) -> Option<([Point2f; 3], Vector3f, Vector3f)> {
        let uv = self.get_uvs();
        // Compute deltas for triangle partial derivatives
        let duv02 = uv[0] - uv[2];
        let duv12 = uv[1] - uv[2];
        let dp02 = p[0] - p[2];
        let dp12 = p[1] - p[2];
        let determinant = duv02[0] * duv12[1] - duv02[1] * duv12[0];
        if Float::abs(determinant) >= 1e-8 {
            let invdet = 1.0 / determinant;
            let dpdu = (duv12[1] * dp02 - duv02[1] * dp12) * invdet;
            let dpdv = (-duv12[0] * dp02 + duv02[0] * dp12) * invdet;
            if Vector3f::cross(&dpdu, &dpdv).length_squared() > 0.0 {
                return Some((uv, dpdu, dpdv));
            }
        }
        // Degenerate uv: any frame around the geometric normal will do
        let ng = Vector3f::cross(&(p[2] - p[0]), &(p[1] - p[0]));
        if ng.length_squared() <= 0.0 {
            return None;
        }
        let (dpdu, dpdv) = coordinate_system(&ng.normalize());
        return Some((uv, dpdu, dpdv));
    }

    /// Watertight ray/triangle test. Returns the hit distance and the
    /// barycentrics of the three vertices.
    fn intersect_watertight(&self, r: &Ray) -> Option<(Float, [Float; 3])> {
        let mesh = self.mesh.as_ref();
        let [p0, p1, p2] = self.vertices();

        if !mesh.two_sided {
            let mut n = Vector3f::cross(&(p0 - p2), &(p1 - p2));
            if mesh.reverse_orientation {
                n = -n;
            }
            if Vector3f::dot(&n, &r.d) >= 0.0 {
                return None;
            }
        }

        // Translate, permute and shear vertices into ray space
        let kz = max_dimension(&r.d.abs());
        let kx = TRI[kz + 1];
        let ky = TRI[kx + 1];
        let d = permute(&r.d, kx, ky, kz);
        let mut p0t = permute(&(p0 - r.o), kx, ky, kz);
        let mut p1t = permute(&(p1 - r.o), kx, ky, kz);
        let mut p2t = permute(&(p2 - r.o), kx, ky, kz);

        let sx = -d.x / d.z;
        let sy = -d.y / d.z;
        let sz = 1.0 / d.z;
        p0t.x += sx * p0t.z;
        p0t.y += sy * p0t.z;
        p1t.x += sx * p1t.z;
        p1t.y += sy * p1t.z;
        p2t.x += sx * p2t.z;
        p2t.y += sy * p2t.z;

        let mut e0 = p1t.x * p2t.y - p1t.y * p2t.x;
        let mut e1 = p2t.x * p0t.y - p2t.y * p0t.x;
        let mut e2 = p0t.x * p1t.y - p0t.y * p1t.x;

        // Fall back to double precision when an edge test lands exactly on zero
        if e0 == 0.0 || e1 == 0.0 || e2 == 0.0 {
            e0 = (p2t.y as f64 * p1t.x as f64 - p2t.x as f64 * p1t.y as f64) as Float;
            e1 = (p0t.y as f64 * p2t.x as f64 - p0t.x as f64 * p2t.y as f64) as Float;
            e2 = (p1t.y as f64 * p0t.x as f64 - p1t.x as f64 * p0t.y as f64) as Float;
        }

        if (e0 < 0.0 || e1 < 0.0 || e2 < 0.0) && (e0 > 0.0 || e1 > 0.0 || e2 > 0.0) {
            return None;
        }
        let det = e0 + e1 + e2;
        if det == 0.0 {
            return None;
        }

        p0t.z *= sz;
        p1t.z *= sz;
        p2t.z *= sz;

        let t_max = r.t_max.get();
        let t_scaled = e0 * p0t.z + e1 * p1t.z + e2 * p2t.z;
        #[allow(clippy::if_same_then_else)]
        if det < 0.0 && (t_scaled >= 0.0 || t_scaled < t_max * det) {
            return None;
        } else if det > 0.0 && (t_scaled <= 0.0 || t_scaled > t_max * det) {
            return None;
        }

        let inv_det = 1.0 / det;
        let t = t_scaled * inv_det;

        // Ensure that computed triangle t is conservatively greater than zero
        let max_zt = max_component(&Vector3f::new(p0t.z, p1t.z, p2t.z).abs());
        let delta_z = GAMMA3 * max_zt;
        let max_xt = max_component(&Vector3f::new(p0t.x, p1t.x, p2t.x).abs());
        let max_yt = max_component(&Vector3f::new(p0t.y, p1t.y, p2t.y).abs());
        let delta_x = GAMMA5 * (max_xt + max_zt);
        let delta_y = GAMMA5 * (max_yt + max_zt);
        let delta_e = 2.0 * (GAMMA2 * max_xt * max_yt + delta_y * max_xt + delta_x * max_yt);
        let max_e = max_component(&Vector3f::new(e0, e1, e2).abs());
        let delta_t = 3.0
            * (GAMMA3 * max_e * max_zt + delta_e * max_zt + delta_z * max_e)
            * Float::abs(inv_det);
        if t <= delta_t {
            return None;
        }

        return Some((t, [e0 * inv_det, e1 * inv_det, e2 * inv_det]));
    }
}

impl Shape for Triangle {
    fn world_bound(&self) -> Bounds3f {
        let [p0, p1, p2] = self.vertices();
        return Bounds3f::from_point(&p0).union_p(&p1).union_p(&p2);
    }

    fn intersect(&self, r: &Ray) -> Option<(Float, SurfaceInteraction)> {
        let (t, [b0, b1, b2]) = self.intersect_watertight(r)?;
        let p = self.vertices();
        let (uv, dpdu, dpdv) = self.get_dpdu_dpdv(&p)?;
        let n = self.geometric_normal()?;

        let x_abs_sum = Float::abs(b0 * p[0].x) + Float::abs(b1 * p[1].x) + Float::abs(b2 * p[2].x);
        let y_abs_sum = Float::abs(b0 * p[0].y) + Float::abs(b1 * p[1].y) + Float::abs(b2 * p[2].y);
        let z_abs_sum = Float::abs(b0 * p[0].z) + Float::abs(b1 * p[1].z) + Float::abs(b2 * p[2].z);
        let p_error = GAMMA7 * Vector3f::new(x_abs_sum, y_abs_sum, z_abs_sum);

        let p_hit = b0 * p[0] + b1 * p[1] + b2 * p[2];
        let uv_hit = b0 * uv[0] + b1 * uv[1] + b2 * uv[2];

        let mut isect = SurfaceInteraction::new(
            &p_hit,
            &p_error,
            &uv_hit,
            &(-r.d),
            &n,
            &dpdu,
            &dpdv,
            &Normal3f::zero(),
            &Normal3f::zero(),
            r.time,
            self.face_index as u32,
        );

        let mesh = self.mesh.as_ref();
        if !mesh.n.is_empty() {
            let i = [self.v[0] as usize, self.v[1] as usize, self.v[2] as usize];
            let mut ns = b0 * mesh.n[i[0]] + b1 * mesh.n[i[1]] + b2 * mesh.n[i[2]];
            ns = if ns.length_squared() > 0.0 {
                ns.normalize()
            } else {
                isect.n
            };
            let mut ss = isect.dpdu.normalize();
            let mut ts = Vector3f::cross(&ns, &ss);
            if ts.length_squared() > 0.0 {
                ts = ts.normalize();
                ss = Vector3f::cross(&ts, &ns).normalize();
            } else {
                let (ss1, ts1) = coordinate_system(&ns);
                ss = ss1;
                ts = ts1;
            }
            if mesh.reverse_orientation {
                ts = -ts;
            }
            isect.set_shading_geometry(&ss, &ts, &Normal3f::zero(), &Normal3f::zero(), true);
        }
        return Some((t, isect));
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        return self.intersect_watertight(r).is_some();
    }

    fn area(&self) -> Float {
        let [p0, p1, p2] = self.vertices();
        return 0.5 * Vector3f::cross(&(p1 - p0), &(p2 - p0)).length();
    }

    fn as_triangle(&self) -> Option<TriangleView> {
        let p = self.vertices();
        // zero-area triangles still register, with a zero normal
        let (uv, dpdu, dpdv) = self.get_dpdu_dpdv(&p).unwrap_or_else(|| {
            let (dpdu, dpdv) = coordinate_system(&Vector3f::new(0.0, 0.0, 1.0));
            (self.get_uvs(), dpdu, dpdv)
        });
        let n = self.geometric_normal().unwrap_or_else(Normal3f::zero);
        return Some(TriangleView {
            p,
            uv,
            dpdu,
            dpdv,
            n,
            face_index: self.face_index as u32,
        });
    }
}

pub fn create_triangle_mesh(
    reverse_orientation: bool,
    vertex_indices: Vec<u32>,
    p: Vec<Point3f>,
    n: Vec<Normal3f>,
    uv: Vec<Point2f>,
    params: &ParamSet,
) -> Result<Vec<Arc<dyn Shape>>, PbrtError> {
    if vertex_indices.len() % 3 != 0 {
        let msg = format!(
            "Number of vertex indices {} not a multiple of 3.",
            vertex_indices.len()
        );
        return Err(PbrtError::error(&msg));
    }
    if let Some(bad) = vertex_indices.iter().find(|i| **i as usize >= p.len()) {
        let msg = format!(
            "trianglemesh has out of-bounds vertex index {} ({} \"P\" values were given)",
            bad,
            p.len()
        );
        return Err(PbrtError::error(&msg));
    }
    let n = if !n.is_empty() && n.len() != p.len() {
        log::warn!("Number of \"N\"s for triangle mesh must match \"P\"s. Discarding \"N\"s.");
        Vec::new()
    } else {
        n
    };
    let uv = if !uv.is_empty() && uv.len() != p.len() {
        log::warn!("Number of \"uv\"s for triangle mesh must match \"P\"s. Discarding \"uv\"s.");
        Vec::new()
    } else {
        uv
    };
    let two_sided = params.find_one_bool("twosided", true);
    let mesh = Arc::new(TriangleMesh::new(reverse_orientation, two_sided, p, n, uv));
    let tris: Vec<Arc<dyn Shape>> = vertex_indices
        .chunks_exact(3)
        .enumerate()
        .map(|(i, v)| -> Arc<dyn Shape> {
            Arc::new(Triangle::new(&mesh, &[v[0], v[1], v[2]], i))
        })
        .collect();
    return Ok(tris);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Vec<Arc<dyn Shape>> {
        let p = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ];
        create_triangle_mesh(
            false,
            vec![0, 1, 2],
            p,
            Vec::new(),
            Vec::new(),
            &ParamSet::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_001() {
        let tris = unit_triangle();
        assert_eq!(tris.len(), 1);
        let r = Ray::new(
            &Point3f::new(0.25, 0.25, 1.0),
            &Vector3f::new(0.0, 0.0, -1.0),
            Float::INFINITY,
            0.0,
        );
        let (t, si) = tris[0].intersect(&r).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
        assert!((si.p - Point3f::new(0.25, 0.25, 0.0)).length() < 1e-5);
        assert!((si.n.z.abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_002() {
        let tris = unit_triangle();
        let r = Ray::new(
            &Point3f::new(0.75, 0.75, 1.0),
            &Vector3f::new(0.0, 0.0, -1.0),
            Float::INFINITY,
            0.0,
        );
        assert!(tris[0].intersect(&r).is_none());
        assert!(!tris[0].intersect_p(&r));
        let r = Ray::new(
            &Point3f::new(0.25, 0.25, 1.0),
            &Vector3f::new(0.0, 0.0, -1.0),
            0.5,
            0.0,
        );
        assert!(!tris[0].intersect_p(&r));
    }

    #[test]
    fn test_003() {
        let tris = unit_triangle();
        let view = tris[0].as_triangle().unwrap();
        assert_eq!(view.p[1], Point3f::new(1.0, 0.0, 0.0));
        let b = view.world_bound();
        assert_eq!(b.min, Point3f::new(0.0, 0.0, 0.0));
        assert_eq!(b.max, Point3f::new(1.0, 1.0, 0.0));
        assert!((tris[0].area() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_004() {
        let r = create_triangle_mesh(
            false,
            vec![0, 1, 3],
            vec![Point3f::zero(); 3],
            Vec::new(),
            Vec::new(),
            &ParamSet::new(),
        );
        assert!(r.is_err());
    }

    #[test]
    fn test_005() {
        let p = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
        ];
        let tris =
            create_triangle_mesh(false, vec![0, 1, 2], p, Vec::new(), Vec::new(), &ParamSet::new())
                .unwrap();
        let view = tris[0].as_triangle().unwrap();
        assert_eq!(view.n, Normal3f::zero());
        assert_eq!(tris[0].area(), 0.0);
        let r = Ray::new(
            &Point3f::new(0.5, 0.0, 1.0),
            &Vector3f::new(0.0, 0.0, -1.0),
            Float::INFINITY,
            0.0,
        );
        assert!(tris[0].intersect(&r).is_none());
    }
}
