use crate::core::error::*;

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Input coordinate systems a BRDF model can be expressed in.
///
/// Angles are in radians. Directions are unit vectors in the local shading
/// frame, the light (incident) direction first and the view (outgoing)
/// direction second.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parametrization {
    /// `[lx, ly, lz, vx, vy, vz]`
    CARTESIAN,
    /// Half/difference angles `[theta_h, phi_h, theta_d, phi_d]`.
    RUSIN_TH_PH_TD_PD,
    RUSIN_TH_TD_PD,
    RUSIN_TH_TD,
    /// `[cos(theta_h)]`
    COS_TH,
    /// `[cos(theta_h), cos(theta_d)]`
    COS_TH_TD,
    /// `[theta_l, phi_l, theta_v, phi_v]`
    SPHERICAL_TL_PL_TV_PV,
    /// `[theta_v, theta_l, phi_v - phi_l]`
    ISOTROPIC_TV_TL_DPHI,
}

const NAMES: [(Parametrization, &str); 8] = [
    (Parametrization::CARTESIAN, "CARTESIAN"),
    (Parametrization::RUSIN_TH_PH_TD_PD, "RUSIN_TH_PH_TD_PD"),
    (Parametrization::RUSIN_TH_TD_PD, "RUSIN_TH_TD_PD"),
    (Parametrization::RUSIN_TH_TD, "RUSIN_TH_TD"),
    (Parametrization::COS_TH, "COS_TH"),
    (Parametrization::COS_TH_TD, "COS_TH_TD"),
    (Parametrization::SPHERICAL_TL_PL_TV_PV, "SPHERICAL_TL_PL_TV_PV"),
    (Parametrization::ISOTROPIC_TV_TL_DPHI, "ISOTROPIC_TV_TL_DPHI"),
];

impl Parametrization {
    pub fn dimension(&self) -> usize {
        match self {
            Parametrization::CARTESIAN => 6,
            Parametrization::RUSIN_TH_PH_TD_PD => 4,
            Parametrization::RUSIN_TH_TD_PD => 3,
            Parametrization::RUSIN_TH_TD => 2,
            Parametrization::COS_TH => 1,
            Parametrization::COS_TH_TD => 2,
            Parametrization::SPHERICAL_TL_PL_TV_PV => 4,
            Parametrization::ISOTROPIC_TV_TL_DPHI => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        return NAMES
            .iter()
            .find(|(p, _)| p == self)
            .map(|(_, n)| *n)
            .unwrap_or("UNKNOWN");
    }
}

impl fmt::Display for Parametrization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Parametrization {
    type Err = PbrtError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match NAMES.iter().find(|(_, n)| *n == s) {
            Some((p, _)) => Ok(*p),
            None => {
                let msg = format!("Unknown parametrization \"{}\"", s);
                Err(PbrtError::error(&msg))
            }
        }
    }
}

type V3 = [f64; 3];

#[inline]
fn dot(a: &V3, b: &V3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn normalize(a: &V3) -> V3 {
    let l = f64::sqrt(dot(a, a));
    if l > 0.0 {
        [a[0] / l, a[1] / l, a[2] / l]
    } else {
        [0.0, 0.0, 1.0]
    }
}

#[inline]
fn theta_phi(v: &V3) -> (f64, f64) {
    let theta = f64::acos(f64::clamp(v[2], -1.0, 1.0));
    let phi = f64::atan2(v[1], v[0]);
    (theta, phi)
}

/// Rotates `v` by `angle` around the z axis.
fn rotate_normal(v: &V3, angle: f64) -> V3 {
    let (s, c) = f64::sin_cos(angle);
    [c * v[0] - s * v[1], s * v[0] + c * v[1], v[2]]
}

/// Rotates `v` by `angle` around the y axis.
fn rotate_binormal(v: &V3, angle: f64) -> V3 {
    let (s, c) = f64::sin_cos(angle);
    [c * v[0] + s * v[2], v[1], -s * v[0] + c * v[2]]
}

/// Half and difference angles `(theta_h, phi_h, theta_d, phi_d)`.
fn half_diff(l: &V3, v: &V3) -> (f64, f64, f64, f64) {
    let h = normalize(&[l[0] + v[0], l[1] + v[1], l[2] + v[2]]);
    let (theta_h, phi_h) = theta_phi(&h);
    let d = rotate_binormal(&rotate_normal(l, -phi_h), -theta_h);
    let (theta_d, phi_d) = theta_phi(&d);
    (theta_h, phi_h, theta_d, phi_d)
}

/// Converts `input`, expressed in `from`, into `to`. Only conversions out of
/// `CARTESIAN` (and identities) are supported.
pub fn convert(
    input: &[f64],
    from: Parametrization,
    to: Parametrization,
    output: &mut [f64],
) -> Result<(), PbrtError> {
    if input.len() < from.dimension() || output.len() < to.dimension() {
        let msg = format!(
            "convert {} -> {}: expected {} inputs and {} outputs, got {} and {}",
            from,
            to,
            from.dimension(),
            to.dimension(),
            input.len(),
            output.len()
        );
        return Err(PbrtError::error(&msg));
    }
    if from == to {
        let n = from.dimension();
        output[..n].copy_from_slice(&input[..n]);
        return Ok(());
    }
    if from != Parametrization::CARTESIAN {
        let msg = format!("convert {} -> {}: unsupported conversion", from, to);
        return Err(PbrtError::error(&msg));
    }

    let l = normalize(&[input[0], input[1], input[2]]);
    let v = normalize(&[input[3], input[4], input[5]]);
    match to {
        Parametrization::CARTESIAN => {}
        Parametrization::RUSIN_TH_PH_TD_PD => {
            let (th, ph, td, pd) = half_diff(&l, &v);
            output[..4].copy_from_slice(&[th, ph, td, pd]);
        }
        Parametrization::RUSIN_TH_TD_PD => {
            let (th, _, td, pd) = half_diff(&l, &v);
            output[..3].copy_from_slice(&[th, td, pd]);
        }
        Parametrization::RUSIN_TH_TD => {
            let (th, _, td, _) = half_diff(&l, &v);
            output[..2].copy_from_slice(&[th, td]);
        }
        Parametrization::COS_TH => {
            let h = normalize(&[l[0] + v[0], l[1] + v[1], l[2] + v[2]]);
            output[0] = h[2];
        }
        Parametrization::COS_TH_TD => {
            let h = normalize(&[l[0] + v[0], l[1] + v[1], l[2] + v[2]]);
            output[0] = h[2];
            output[1] = dot(&h, &l);
        }
        Parametrization::SPHERICAL_TL_PL_TV_PV => {
            let (tl, pl) = theta_phi(&l);
            let (tv, pv) = theta_phi(&v);
            output[..4].copy_from_slice(&[tl, pl, tv, pv]);
        }
        Parametrization::ISOTROPIC_TV_TL_DPHI => {
            let (tl, pl) = theta_phi(&l);
            let (tv, pv) = theta_phi(&v);
            let mut dphi = pv - pl;
            if dphi < 0.0 {
                dphi += 2.0 * PI;
            }
            output[..3].copy_from_slice(&[tv, tl, dphi]);
        }
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(theta: f64, phi: f64) -> V3 {
        [
            f64::sin(theta) * f64::cos(phi),
            f64::sin(theta) * f64::sin(phi),
            f64::cos(theta),
        ]
    }

    #[test]
    fn test_001() {
        for (p, n) in NAMES.iter() {
            assert_eq!(Parametrization::from_str(n).unwrap(), *p);
            assert_eq!(p.to_string(), *n);
        }
        assert!(Parametrization::from_str("STEREOGRAPHIC").is_err());
    }

    #[test]
    fn test_002() {
        // mirror configuration: half vector is the normal
        let l = dir(0.5, 0.3);
        let v = dir(0.5, 0.3 + PI);
        let cart = [l[0], l[1], l[2], v[0], v[1], v[2]];
        let mut x = [0.0; 3];
        convert(
            &cart,
            Parametrization::CARTESIAN,
            Parametrization::RUSIN_TH_TD_PD,
            &mut x,
        )
        .unwrap();
        assert!(x[0].abs() < 1e-6);
        assert!((x[1] - 0.5).abs() < 1e-6);

        let mut c = [0.0; 1];
        convert(&cart, Parametrization::CARTESIAN, Parametrization::COS_TH, &mut c).unwrap();
        assert!((c[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_003() {
        let l = dir(0.2, 0.0);
        let v = dir(0.7, 1.0);
        let cart = [l[0], l[1], l[2], v[0], v[1], v[2]];
        let mut x = [0.0; 4];
        convert(
            &cart,
            Parametrization::CARTESIAN,
            Parametrization::SPHERICAL_TL_PL_TV_PV,
            &mut x,
        )
        .unwrap();
        assert!((x[0] - 0.2).abs() < 1e-9);
        assert!((x[2] - 0.7).abs() < 1e-9);
        assert!((x[3] - 1.0).abs() < 1e-9);

        let mut y = [0.0; 3];
        assert!(convert(
            &x,
            Parametrization::SPHERICAL_TL_PL_TV_PV,
            Parametrization::RUSIN_TH_TD_PD,
            &mut y
        )
        .is_err());
    }
}
