use crate::core::base::*;

#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    return w.z;
}

#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    return Float::abs(w.z);
}

#[inline]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    return w.z * wp.z > 0.0;
}
