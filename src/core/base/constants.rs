use crate::core::pbrt::types::Float;

pub const PI: Float = std::f32::consts::PI;
pub const INV_PI: Float = std::f32::consts::FRAC_1_PI;
pub const INV_2_PI: Float = 0.5 * std::f32::consts::FRAC_1_PI;
pub const PI_OVER_2: Float = std::f32::consts::FRAC_PI_2;
pub const PI_OVER_4: Float = std::f32::consts::FRAC_PI_4;
pub const ONE_MINUS_EPSILON: Float = 1.0 - Float::EPSILON;
pub const MACHINE_EPSILON: Float = Float::EPSILON * 0.5;

#[inline]
pub fn lerp(t: Float, v1: Float, v2: Float) -> Float {
    return (1.0 - t) * v1 + t * v2;
}

#[inline]
pub fn gamma(n: i32) -> Float {
    let n = n as Float;
    return (n * MACHINE_EPSILON) / (1.0 - n * MACHINE_EPSILON);
}

#[inline]
pub fn radians(deg: Float) -> Float {
    return (PI / 180.0) * deg;
}
