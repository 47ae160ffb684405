use crate::core::base::*;

fn toa(v: &Vector3f) -> [Float; 3] {
    [v.x, v.y, v.z]
}

/// Slab test of a ray against an axis aligned box, clipped to `[t0, t1]`.
pub fn intersect_box(
    min: &Vector3f,
    max: &Vector3f,
    org: &Vector3f,
    dir: &Vector3f,
    t0: Float,
    t1: Float,
) -> (bool, Float, Float) {
    let idir = [
        Float::recip(dir.x),
        Float::recip(dir.y),
        Float::recip(dir.z),
    ];
    let sign = [
        dir.x.is_sign_negative() as usize,
        dir.y.is_sign_negative() as usize,
        dir.z.is_sign_negative() as usize,
    ];
    if let Some((t0, t1)) = intersect_box_i(&toa(min), &toa(max), &toa(org), &idir, &sign, t0, t1)
    {
        return (true, t0, t1);
    } else {
        return (false, t0, t1);
    }
}

#[inline(always)]
pub fn intersect_box_i(
    min: &[Float; 3],
    max: &[Float; 3],
    org: &[Float; 3],
    idir: &[Float; 3],
    sign: &[usize; 3],
    mut t0: Float,
    mut t1: Float,
) -> Option<(Float, Float)> {
    let bounds = [min, max];
    for i in 0..3 {
        let tn = (bounds[sign[i]][i] - org[i]) * idir[i];
        let tf = (bounds[1 - sign[i]][i] - org[i]) * idir[i] * (1.0 + 2.0 * gamma(3));
        // NaN from 0 * inf leaves the interval untouched
        if tn > t0 {
            t0 = tn;
        }
        if tf < t1 {
            t1 = tf;
        }
        if t0 > t1 {
            return None;
        }
    }
    return Some((t0, t1));
}
