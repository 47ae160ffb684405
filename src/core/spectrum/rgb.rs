use crate::core::base::*;
use std::ops;

const YWEIGHT: [Float; 3] = [0.212671, 0.715160, 0.072169];

#[derive(Debug, PartialEq, Copy, Clone, Default)]
pub struct RGBSpectrum {
    c: [Float; 3],
}

impl RGBSpectrum {
    pub const N_SAMPLES: usize = 3;

    #[inline]
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        RGBSpectrum { c: [r, g, b] }
    }

    #[inline]
    pub fn zero() -> Self {
        RGBSpectrum { c: [0.0; 3] }
    }

    #[inline]
    pub fn one() -> Self {
        RGBSpectrum { c: [1.0; 3] }
    }

    pub fn clamp(&self, low: Float, hi: Float) -> Self {
        let c = &self.c;
        RGBSpectrum::new(
            Float::clamp(c[0], low, hi),
            Float::clamp(c[1], low, hi),
            Float::clamp(c[2], low, hi),
        )
    }

    pub fn clamp_zero(&self) -> Self {
        return self.clamp(0.0, Float::INFINITY);
    }

    pub fn max_component_value(&self) -> Float {
        let c = &self.c;
        return Float::max(c[0], Float::max(c[1], c[2]));
    }

    pub fn y(&self) -> Float {
        let c = &self.c;
        return YWEIGHT[0] * c[0] + YWEIGHT[1] * c[1] + YWEIGHT[2] * c[2];
    }

    pub fn to_rgb(&self) -> [Float; 3] {
        return self.c;
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        return self.c.iter().all(|x| *x == 0.0);
    }

    pub fn is_valid(&self) -> bool {
        return self.c.iter().all(|x| x.is_finite());
    }
}

impl From<Float> for RGBSpectrum {
    fn from(v: Float) -> Self {
        RGBSpectrum { c: [v; 3] }
    }
}

impl From<[Float; 3]> for RGBSpectrum {
    fn from(c: [Float; 3]) -> Self {
        RGBSpectrum { c }
    }
}

impl ops::Index<usize> for RGBSpectrum {
    type Output = Float;
    #[inline]
    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl ops::Add for RGBSpectrum {
    type Output = RGBSpectrum;
    #[inline]
    fn add(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::new(
            self.c[0] + rhs.c[0],
            self.c[1] + rhs.c[1],
            self.c[2] + rhs.c[2],
        )
    }
}

impl ops::AddAssign for RGBSpectrum {
    #[inline]
    fn add_assign(&mut self, rhs: RGBSpectrum) {
        for i in 0..3 {
            self.c[i] += rhs.c[i];
        }
    }
}

impl ops::Mul for RGBSpectrum {
    type Output = RGBSpectrum;
    #[inline]
    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::new(
            self.c[0] * rhs.c[0],
            self.c[1] * rhs.c[1],
            self.c[2] * rhs.c[2],
        )
    }
}

impl ops::Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;
    #[inline]
    fn mul(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum::new(self.c[0] * rhs, self.c[1] * rhs, self.c[2] * rhs)
    }
}

impl ops::Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;
    #[inline]
    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        rhs * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let s = RGBSpectrum::new(0.25, -0.5, 2.0);
        assert_eq!(s.clamp_zero(), RGBSpectrum::new(0.25, 0.0, 2.0));
        assert_eq!(s.max_component_value(), 2.0);
    }

    #[test]
    fn test_002() {
        let a = RGBSpectrum::from(0.5);
        let b = RGBSpectrum::new(1.0, 2.0, 3.0);
        assert_eq!((a + b) * 0.5, RGBSpectrum::new(0.75, 1.25, 1.75));
        assert!(RGBSpectrum::zero().is_black());
        assert!(!a.is_black());
    }
}
