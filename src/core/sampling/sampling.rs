use crate::core::base::*;

pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    let u_offset = Point2f::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0);
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::zero();
    }
    let (r, theta) = if Float::abs(u_offset.x) > Float::abs(u_offset.y) {
        (u_offset.x, PI_OVER_4 * (u_offset.y / u_offset.x))
    } else {
        (
            u_offset.y,
            PI_OVER_2 - PI_OVER_4 * (u_offset.x / u_offset.y),
        )
    };
    return Point2f::new(Float::cos(theta), Float::sin(theta)) * r;
}

pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = Float::sqrt(Float::max(0.0, 1.0 - d.x * d.x - d.y * d.y));
    return Vector3f::new(d.x, d.y, z);
}

#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    return cos_theta * INV_PI;
}
