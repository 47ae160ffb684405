use crate::alta::*;
use crate::core::pbrt::*;

use log::*;
use std::sync::Arc;

/// Reflection lobe backed by a measured or fitted BRDF model.
#[derive(Debug, Clone)]
pub struct AltaBRDF {
    model: BrdfModel,
    symmetrize: bool,
}

impl AltaBRDF {
    pub fn new(model: &BrdfModel, symmetrize: bool) -> Self {
        AltaBRDF {
            model: model.clone(),
            symmetrize,
        }
    }

    pub fn model(&self) -> &BrdfModel {
        return &self.model;
    }

    /// Model value with `wi` as the light direction and `wo` as the view
    /// direction. Zero unless both lie above the surface.
    pub fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return Spectrum::zero();
        }
        let l = [wi.x as f64, wi.y as f64, wi.z as f64];
        let v = [wo.x as f64, wo.y as f64, wo.z as f64];
        let y = match self.model.value_cartesian(&l, &v) {
            Ok(y) => y,
            Err(e) => {
                // the parametrization was checked when the material was loaded
                debug!("alta: {}", e);
                return Spectrum::zero();
            }
        };
        if self.model.dim_y() == 3 && y.len() >= 3 {
            return Spectrum::new(
                f64::max(y[0], 0.0) as Float,
                f64::max(y[1], 0.0) as Float,
                f64::max(y[2], 0.0) as Float,
            );
        }
        let g = y.first().map(|v| f64::max(*v, 0.0)).unwrap_or(0.0) as Float;
        return Spectrum::new(g, g, g);
    }
}

impl BxDF for AltaBRDF {
    fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        if self.symmetrize {
            return (self.eval(wo, wi) + self.eval(wi, wo)) * 0.5;
        }
        return self.eval(wo, wi);
    }

    fn get_type(&self) -> BxDFType {
        return BSDF_REFLECTION | BSDF_GLOSSY;
    }

    fn to_string(&self) -> String {
        return format!(
            "[ AltaBRDF model: {} symmetrize: {} ]",
            self.model.name(),
            self.symmetrize
        );
    }
}

pub struct AltaMaterial {
    model: BrdfModel,
    symmetrize: bool,
}

impl AltaMaterial {
    pub fn new(model: BrdfModel, symmetrize: bool) -> Self {
        AltaMaterial { model, symmetrize }
    }

    /// Loads the model once; every BSDF built afterwards shares it.
    pub fn load(
        filename: &str,
        plugin: &str,
        kind: ModelKind,
        symmetrize: bool,
    ) -> Result<Self, PbrtError> {
        if filename.is_empty() {
            return Err(PbrtError::error("alta: \"filename\" is required"));
        }
        let model = BrdfModel::load(kind, filename, plugin)?;
        // evaluation converts from Cartesian, so reject models it cannot reach
        let mut x = [0.0; 6];
        convert(
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            Parametrization::CARTESIAN,
            model.input_parametrization(),
            &mut x,
        )?;
        info!(
            "alta: loaded {} from {} ({} -> {})",
            model.name(),
            filename,
            model.input_parametrization(),
            model.dim_y()
        );
        return Ok(Self::new(model, symmetrize));
    }

    pub fn model(&self) -> &BrdfModel {
        return &self.model;
    }
}

impl Material for AltaMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        arena: &mut MemoryArena,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
        let mut b = arena.alloc_bsdf(si, 1.0);
        let r: Arc<dyn BxDF> = Arc::new(AltaBRDF::new(&self.model, self.symmetrize));
        b.add(&r);
        si.bsdf = Some(Arc::new(b));
    }
}

pub fn create_alta_material(mp: &TextureParams) -> Result<Arc<dyn Material>, PbrtError> {
    let filename = mp.find_filename("filename", "");
    let plugin = mp.find_string("plugin", "");
    let plugin_type = mp.find_string("plugin-type", "");
    let symmetrize = mp.find_bool("symmetrize", false);
    let kind = ModelKind::from_plugin_type(&plugin_type);
    let material = AltaMaterial::load(&filename, &plugin, kind, symmetrize)?;
    return Ok(Arc::new(material));
}
