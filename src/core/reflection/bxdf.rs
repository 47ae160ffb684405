use crate::core::pbrt::*;

pub type BxDFType = u32;

pub const BSDF_REFLECTION: BxDFType = 1 << 0;
pub const BSDF_TRANSMISSION: BxDFType = 1 << 1;
pub const BSDF_DIFFUSE: BxDFType = 1 << 2;
pub const BSDF_GLOSSY: BxDFType = 1 << 3;
pub const BSDF_SPECULAR: BxDFType = 1 << 4;
pub const BSDF_ALL: BxDFType =
    BSDF_REFLECTION | BSDF_TRANSMISSION | BSDF_DIFFUSE | BSDF_GLOSSY | BSDF_SPECULAR;

/// A single scattering lobe, evaluated in the local shading frame where the
/// normal is +Z.
pub trait BxDF: Send + Sync {
    fn matches_flags(&self, t: BxDFType) -> bool {
        let tp = self.get_type();
        return (tp & t) == tp;
    }

    fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum;

    fn sample_f(
        &self,
        wo: &Vector3f,
        sample: &Point2f,
    ) -> Option<(Spectrum, Vector3f, Float, BxDFType)> {
        return self.sample_f_default(wo, sample);
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        return self.pdf_default(wo, wi);
    }

    fn get_type(&self) -> BxDFType;

    fn to_string(&self) -> String {
        return format!("[ BxDF type: {} ]", self.get_type());
    }

    fn sample_f_default(
        &self,
        wo: &Vector3f,
        sample: &Point2f,
    ) -> Option<(Spectrum, Vector3f, Float, BxDFType)> {
        let mut wi = cosine_sample_hemisphere(sample);
        if wo.z < 0.0 {
            wi.z *= -1.0;
        }
        let pdf = self.pdf(wo, &wi);
        let spc = self.f(wo, &wi);
        return Some((spc, wi, pdf, 0));
    }

    fn pdf_default(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        return if same_hemisphere(wo, wi) {
            abs_cos_theta(wi) * INV_PI
        } else {
            0.0
        };
    }
}
