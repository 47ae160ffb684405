use crate::core::pbrt::*;

use std::fmt::Formatter;
use std::fmt::Result;
use std::{fmt::Debug, sync::Arc};

/// The set of lobes attached to one shading point.
#[derive(Clone)]
pub struct BSDF {
    pub eta: Float,
    pub ns: Normal3f,
    pub ng: Normal3f,
    pub ss: Vector3f,
    pub ts: Vector3f,
    pub bxdfs: Vec<Arc<dyn BxDF>>,
}

impl Debug for BSDF {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("BSDF")
            .field("eta", &self.eta)
            .field("ns", &self.ns)
            .field("ng", &self.ng)
            .field("ss", &self.ss)
            .field("ts", &self.ts)
            .field("bxdfs", &self.bxdfs.len())
            .finish()
    }
}

impl BSDF {
    pub fn new(si: &SurfaceInteraction, eta: Float) -> Self {
        let ns = si.shading.n;
        let ng = si.n;
        let ss = si.shading.dpdu.normalize();
        let ts = Vector3f::cross(&ns, &ss).normalize();
        BSDF {
            eta,
            ns,
            ng,
            ss,
            ts,
            bxdfs: Vec::new(),
        }
    }

    pub fn add(&mut self, bxdf: &Arc<dyn BxDF>) {
        self.bxdfs.push(Arc::clone(bxdf));
    }

    pub fn num_components(&self, flags: BxDFType) -> usize {
        return self.bxdfs.iter().filter(|b| b.matches_flags(flags)).count();
    }

    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        return Vector3f::new(
            Vector3f::dot(v, &self.ss),
            Vector3f::dot(v, &self.ts),
            Vector3f::dot(v, &self.ns),
        );
    }

    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        let x = self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z;
        let y = self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z;
        let z = self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z;
        return Vector3f::new(x, y, z);
    }

    fn lobe_applies(bxdf: &dyn BxDF, flags: BxDFType, reflect: bool) -> bool {
        let tp = bxdf.get_type();
        return bxdf.matches_flags(flags)
            && ((reflect && (tp & BSDF_REFLECTION) != 0)
                || (!reflect && (tp & BSDF_TRANSMISSION) != 0));
    }

    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, flags: BxDFType) -> Spectrum {
        let wi = self.world_to_local(wi_w);
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return Spectrum::zero();
        }
        let reflect = (Vector3f::dot(wi_w, &self.ng) * Vector3f::dot(wo_w, &self.ng)) > 0.0;
        return self
            .bxdfs
            .iter()
            .filter(|bxdf| Self::lobe_applies(bxdf.as_ref(), flags, reflect))
            .map(|bxdf| bxdf.f(&wo, &wi))
            .fold(Spectrum::zero(), |a, b| a + b);
    }

    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f, flags: BxDFType) -> Float {
        let wi = self.world_to_local(wi_w);
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return 0.0;
        }
        let count = self.num_components(flags);
        if count == 0 {
            return 0.0;
        }
        let pdf: Float = self
            .bxdfs
            .iter()
            .filter(|b| b.matches_flags(flags))
            .map(|b| b.pdf(&wo, &wi))
            .sum();
        return pdf / count as Float;
    }

    pub fn sample_f(
        &self,
        wo_w: &Vector3f,
        u: &Point2f,
        flags: BxDFType,
    ) -> Option<(Spectrum, Vector3f, Float, BxDFType)> {
        let matching_comps = self.num_components(flags);
        if matching_comps == 0 {
            return None;
        }
        let comp = usize::min(
            Float::floor(u[0] * matching_comps as Float) as usize,
            matching_comps - 1,
        );
        let (index, bxdf) = self
            .bxdfs
            .iter()
            .enumerate()
            .filter(|(_, b)| b.matches_flags(flags))
            .nth(comp)?;
        // Remap the sample to [0,1)^2 for the chosen lobe
        let remapped = Point2f::new(
            Float::min(
                u[0] * matching_comps as Float - comp as Float,
                ONE_MINUS_EPSILON,
            ),
            u[1],
        );
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return None;
        }
        let (f, wi, pdf, t) = bxdf.sample_f(&wo, &remapped)?;
        if pdf == 0.0 {
            return None;
        }
        let sampled_type = if t != 0 { t } else { bxdf.get_type() };
        let wi_w = self.local_to_world(&wi);

        let mut pdf = pdf;
        let mut f = f;
        if (bxdf.get_type() & BSDF_SPECULAR) == 0 && matching_comps > 1 {
            for (i, other) in self.bxdfs.iter().enumerate() {
                if i != index && other.matches_flags(flags) {
                    pdf += other.pdf(&wo, &wi);
                }
            }
        }
        if matching_comps > 1 {
            pdf /= matching_comps as Float;
        }
        if (bxdf.get_type() & BSDF_SPECULAR) == 0 {
            f = self.f(wo_w, &wi_w, flags);
        }
        return Some((f, wi_w, pdf, sampled_type));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_interaction() -> SurfaceInteraction {
        SurfaceInteraction::new(
            &Point3f::zero(),
            &Vector3f::zero(),
            &Point2f::zero(),
            &Vector3f::new(0.0, 0.0, 1.0),
            &Normal3f::new(0.0, 0.0, 1.0),
            &Vector3f::new(1.0, 0.0, 0.0),
            &Vector3f::new(0.0, 1.0, 0.0),
            &Normal3f::zero(),
            &Normal3f::zero(),
            0.0,
            0,
        )
    }

    #[test]
    fn test_001() {
        let si = flat_interaction();
        let bsdf = BSDF::new(&si, 1.0);
        let v = Vector3f::new(0.3, -0.2, 0.9).normalize();
        let l = bsdf.world_to_local(&v);
        let w = bsdf.local_to_world(&l);
        assert!((v - w).length() < 1e-6);
    }

    #[test]
    fn test_002() {
        let si = flat_interaction();
        let mut bsdf = BSDF::new(&si, 1.0);
        let lambert: Arc<dyn BxDF> = Arc::new(LambertianReflection::new(&Spectrum::from(0.5)));
        bsdf.add(&lambert);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let f = bsdf.f(&wo, &wi, BSDF_ALL);
        assert!((f[0] - 0.5 * INV_PI).abs() < 1e-6);
        // transmission direction hits no reflection lobe
        let wt = Vector3f::new(0.6, 0.0, -0.8);
        assert!(bsdf.f(&wo, &wt, BSDF_ALL).is_black());
    }
}
