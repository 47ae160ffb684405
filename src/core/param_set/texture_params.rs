use super::param_set::ParamSet;
use crate::core::pbrt::*;

/// Lookup over the parameters of a material directive, falling back to the
/// parameters of the shape it is bound to.
pub struct TextureParams<'a> {
    pub geom_params: &'a ParamSet,
    pub mat_params: &'a ParamSet,
}

impl<'a> TextureParams<'a> {
    pub fn new(geom_params: &'a ParamSet, mat_params: &'a ParamSet) -> Self {
        TextureParams::<'a> {
            geom_params,
            mat_params,
        }
    }

    pub fn find_float(&self, key: &str, value: Float) -> Float {
        return self
            .geom_params
            .find_one_float(key, self.mat_params.find_one_float(key, value));
    }

    pub fn find_int(&self, key: &str, value: i32) -> i32 {
        return self
            .geom_params
            .find_one_int(key, self.mat_params.find_one_int(key, value));
    }

    pub fn find_bool(&self, key: &str, value: bool) -> bool {
        return self
            .geom_params
            .find_one_bool(key, self.mat_params.find_one_bool(key, value));
    }

    pub fn find_spectrum(&self, key: &str, value: &Spectrum) -> Spectrum {
        return self
            .geom_params
            .find_one_spectrum(key, &self.mat_params.find_one_spectrum(key, value));
    }

    pub fn find_string(&self, key: &str, value: &str) -> String {
        return self
            .geom_params
            .find_one_string(key, &self.mat_params.find_one_string(key, value));
    }

    pub fn find_filename(&self, key: &str, value: &str) -> String {
        return self.find_string(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let geom = ParamSet::new();
        let mut mat = ParamSet::new();
        mat.add_string("string filename", "gold.binary");
        mat.add_bool("bool symmetrize", true);
        let tp = TextureParams::new(&geom, &mat);
        assert_eq!(tp.find_filename("filename", ""), "gold.binary");
        assert!(tp.find_bool("symmetrize", false));
        assert_eq!(tp.find_string("plugin", "data_merl"), "data_merl");
    }
}
