use crate::core::base::*;

#[inline]
pub fn face_forward(n: &Vector3f, v: &Vector3f) -> Vector3f {
    if Vector3f::dot(n, v) < 0.0 {
        return -*n;
    } else {
        return *n;
    }
}

#[inline]
pub fn max_component(v: &Vector3f) -> Float {
    return Float::max(v.x, Float::max(v.y, v.z));
}

#[inline]
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if Float::abs(v1.x) > Float::abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / Float::sqrt(v1.x * v1.x + v1.z * v1.z)
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / Float::sqrt(v1.y * v1.y + v1.z * v1.z)
    };
    let v3 = Vector3f::cross(v1, &v2).normalize();
    return (v2, v3);
}

#[inline]
pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    return Vector3f::new(
        sin_theta * Float::cos(phi),
        sin_theta * Float::sin(phi),
        cos_theta,
    );
}

#[inline]
pub fn max_dimension(v: &Vector3f) -> usize {
    if v.x > v.y {
        if v.x > v.z {
            0
        } else {
            2
        }
    } else if v.y > v.z {
        1
    } else {
        2
    }
}

#[inline]
pub fn permute(v: &Vector3f, x: usize, y: usize, z: usize) -> Vector3f {
    return Vector3f::new(v[x], v[y], v[z]);
}
