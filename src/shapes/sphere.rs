use crate::core::error::*;
use crate::core::param_set::*;
use crate::core::pbrt::*;

const MACHINE_EPSILON: Float = Float::EPSILON * 0.5;
const GAMMA5: Float = (5.0 * MACHINE_EPSILON) / (1.0 - (5.0 * MACHINE_EPSILON));

/// Full sphere placed directly in world space.
#[derive(Debug, PartialEq, Clone)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
    pub reverse_orientation: bool,
}

/// Solves a*t^2 + b*t + c = 0 in double precision, returning the roots in
/// ascending order.
fn quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    let discrim = b * b - 4.0 * a * c;
    if discrim < 0.0 || a == 0.0 {
        return None;
    }
    let root_discrim = f64::sqrt(discrim);
    let q = if b < 0.0 {
        -0.5 * (b - root_discrim)
    } else {
        -0.5 * (b + root_discrim)
    };
    let t0 = q / a;
    let t1 = if q != 0.0 { c / q } else { t0 };
    if t0 > t1 {
        return Some((t1, t0));
    }
    return Some((t0, t1));
}

impl Sphere {
    pub fn new(center: &Point3f, radius: Float, reverse_orientation: bool) -> Self {
        Sphere {
            center: *center,
            radius,
            reverse_orientation,
        }
    }

    fn hit_distance(&self, r: &Ray) -> Option<Float> {
        let o = r.o - self.center;
        let (ox, oy, oz) = (o.x as f64, o.y as f64, o.z as f64);
        let (dx, dy, dz) = (r.d.x as f64, r.d.y as f64, r.d.z as f64);
        let rad = self.radius as f64;
        let a = dx * dx + dy * dy + dz * dz;
        let b = 2.0 * (dx * ox + dy * oy + dz * oz);
        let c = ox * ox + oy * oy + oz * oz - rad * rad;
        let (t0, t1) = quadratic(a, b, c)?;

        let t_max = r.t_max.get() as f64;
        if t0 > t_max || t1 <= 0.0 {
            return None;
        }
        let t_hit = if t0 > 0.0 { t0 } else { t1 };
        if t_hit > t_max {
            return None;
        }
        return Some(t_hit as Float);
    }
}

impl Shape for Sphere {
    fn world_bound(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        return Bounds3f::new(&(self.center - r), &(self.center + r));
    }

    fn intersect(&self, r: &Ray) -> Option<(Float, SurfaceInteraction)> {
        let t_hit = self.hit_distance(r)?;

        // Refine the hit point back onto the surface
        let mut p_local = r.position(t_hit) - self.center;
        p_local = p_local * (self.radius / p_local.length());
        if p_local.x == 0.0 && p_local.y == 0.0 {
            p_local.x = 1e-5 * self.radius;
        }
        let mut phi = Float::atan2(p_local.y, p_local.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        let cos_theta = Float::clamp(p_local.z / self.radius, -1.0, 1.0);
        let theta = Float::acos(cos_theta);
        let u = phi / (2.0 * PI);
        let v = theta / PI;

        let z_radius = Float::sqrt(p_local.x * p_local.x + p_local.y * p_local.y);
        let cos_phi = p_local.x / z_radius;
        let sin_phi = p_local.y / z_radius;
        let dpdu = Vector3f::new(-2.0 * PI * p_local.y, 2.0 * PI * p_local.x, 0.0);
        let dpdv = PI
            * Vector3f::new(
                p_local.z * cos_phi,
                p_local.z * sin_phi,
                -self.radius * Float::sin(theta),
            );

        let mut n = p_local.normalize();
        if self.reverse_orientation {
            n = -n;
        }
        let p_error = GAMMA5 * p_local.abs();
        let isect = SurfaceInteraction::new(
            &(self.center + p_local),
            &p_error,
            &Point2f::new(u, v),
            &(-r.d),
            &n,
            &dpdu,
            &dpdv,
            &Normal3f::zero(),
            &Normal3f::zero(),
            r.time,
            0,
        );
        return Some((t_hit, isect));
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        return self.hit_distance(r).is_some();
    }

    fn area(&self) -> Float {
        return 4.0 * PI * self.radius * self.radius;
    }
}

pub fn create_sphere_shape(reverse_orientation: bool, params: &ParamSet) -> Result<Sphere, PbrtError> {
    let radius = params.find_one_float("radius", 1.0);
    if radius <= 0.0 {
        let msg = format!("sphere radius must be positive, got {}", radius);
        return Err(PbrtError::error(&msg));
    }
    let center = params.find_one_point3f("center", &Point3f::zero());
    return Ok(Sphere::new(&center, radius, reverse_orientation));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let s = Sphere::new(&Point3f::new(0.0, 0.0, 5.0), 1.0, false);
        let r = Ray::new(
            &Point3f::zero(),
            &Vector3f::new(0.0, 0.0, 1.0),
            Float::INFINITY,
            0.0,
        );
        let (t, si) = s.intersect(&r).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        assert!((si.n.z + 1.0).abs() < 1e-5);
        assert!(s.as_triangle().is_none());
    }

    #[test]
    fn test_002() {
        let s = Sphere::new(&Point3f::new(0.0, 0.0, 5.0), 1.0, false);
        let r = Ray::new(&Point3f::zero(), &Vector3f::new(0.0, 0.0, 1.0), 3.0, 0.0);
        assert!(!s.intersect_p(&r));
        let r = Ray::new(
            &Point3f::zero(),
            &Vector3f::new(0.0, 1.0, 0.0),
            Float::INFINITY,
            0.0,
        );
        assert!(s.intersect(&r).is_none());
    }
}
