use super::params::*;
use crate::core::error::*;

use std::sync::Arc;

/// An analytic BRDF model fitted by the BRDF library.
pub trait Function: Send + Sync {
    fn name(&self) -> &str;

    fn dim_x(&self) -> usize {
        return self.input_parametrization().dimension();
    }

    fn dim_y(&self) -> usize;

    fn input_parametrization(&self) -> Parametrization;

    /// Evaluates the model at `x`, given in `input_parametrization()`.
    fn value(&self, x: &[f64]) -> Vec<f64>;
}

/// Constant reflectance `kd` per channel.
pub struct DiffuseFunction {
    param: Parametrization,
    kd: Vec<f64>,
}

impl DiffuseFunction {
    pub fn new(param: Parametrization, kd: &[f64]) -> Self {
        DiffuseFunction {
            param,
            kd: kd.to_vec(),
        }
    }
}

impl Function for DiffuseFunction {
    fn name(&self) -> &str {
        return "nonlinear_function_diffuse";
    }

    fn dim_y(&self) -> usize {
        return self.kd.len();
    }

    fn input_parametrization(&self) -> Parametrization {
        return self.param;
    }

    fn value(&self, _x: &[f64]) -> Vec<f64> {
        return self.kd.clone();
    }
}

/// Blinn-Phong lobe `ks * cos(theta_h)^n` per channel.
pub struct BlinnFunction {
    param: Parametrization,
    ks: Vec<f64>,
    n: Vec<f64>,
}

impl BlinnFunction {
    pub fn new(param: Parametrization, ks: &[f64], n: &[f64]) -> Result<Self, PbrtError> {
        match param {
            Parametrization::COS_TH
            | Parametrization::COS_TH_TD
            | Parametrization::RUSIN_TH_TD
            | Parametrization::RUSIN_TH_TD_PD
            | Parametrization::RUSIN_TH_PH_TD_PD => {}
            _ => {
                let msg = format!("nonlinear_function_blinn: unsupported parametrization {}", param);
                return Err(PbrtError::error(&msg));
            }
        }
        if ks.len() != n.len() {
            return Err(PbrtError::error(
                "nonlinear_function_blinn: Ks and N counts differ",
            ));
        }
        return Ok(BlinnFunction {
            param,
            ks: ks.to_vec(),
            n: n.to_vec(),
        });
    }

    fn cos_theta_h(&self, x: &[f64]) -> f64 {
        match self.param {
            Parametrization::COS_TH | Parametrization::COS_TH_TD => x[0],
            _ => f64::cos(x[0]),
        }
    }
}

impl Function for BlinnFunction {
    fn name(&self) -> &str {
        return "nonlinear_function_blinn";
    }

    fn dim_y(&self) -> usize {
        return self.ks.len();
    }

    fn input_parametrization(&self) -> Parametrization {
        return self.param;
    }

    fn value(&self, x: &[f64]) -> Vec<f64> {
        let c = f64::max(self.cos_theta_h(x), 0.0);
        return self
            .ks
            .iter()
            .zip(self.n.iter())
            .map(|(ks, n)| ks * f64::powf(c, *n))
            .collect();
    }
}

/// One Lafortune lobe for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LafortuneLobe {
    pub cx: f64,
    pub cy: f64,
    pub cz: f64,
    pub n: f64,
}

/// Sum of generalized cosine lobes, evaluated on Cartesian input.
pub struct LafortuneFunction {
    // lobes[k][channel]
    lobes: Vec<Vec<LafortuneLobe>>,
    dim_y: usize,
}

impl LafortuneFunction {
    pub fn new(lobes: Vec<Vec<LafortuneLobe>>, dim_y: usize) -> Result<Self, PbrtError> {
        if lobes.iter().any(|l| l.len() != dim_y) {
            return Err(PbrtError::error(
                "nonlinear_function_lafortune: every lobe needs one entry per channel",
            ));
        }
        return Ok(LafortuneFunction { lobes, dim_y });
    }
}

impl Function for LafortuneFunction {
    fn name(&self) -> &str {
        return "nonlinear_function_lafortune";
    }

    fn dim_y(&self) -> usize {
        return self.dim_y;
    }

    fn input_parametrization(&self) -> Parametrization {
        return Parametrization::CARTESIAN;
    }

    fn value(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.dim_y];
        for lobe in self.lobes.iter() {
            for (c, l) in lobe.iter().enumerate() {
                let d = l.cx * x[0] * x[3] + l.cy * x[1] * x[4] + l.cz * x[2] * x[5];
                if d > 0.0 {
                    y[c] += f64::powf(d, l.n);
                }
            }
        }
        return y;
    }
}

/// Sum of several functions sharing one input parametrization.
pub struct CompoundFunction {
    parts: Vec<Arc<dyn Function>>,
    param: Parametrization,
    dim_y: usize,
}

impl CompoundFunction {
    pub fn new(parts: Vec<Arc<dyn Function>>) -> Result<Self, PbrtError> {
        let first = parts
            .first()
            .ok_or_else(|| PbrtError::error("compound function without parts"))?;
        let param = first.input_parametrization();
        let dim_y = first.dim_y();
        for p in parts.iter() {
            if p.input_parametrization() != param || p.dim_y() != dim_y {
                let msg = format!(
                    "compound function: {} ({} -> {}) does not match {} -> {}",
                    p.name(),
                    p.input_parametrization(),
                    p.dim_y(),
                    param,
                    dim_y
                );
                return Err(PbrtError::error(&msg));
            }
        }
        return Ok(CompoundFunction {
            parts,
            param,
            dim_y,
        });
    }

    pub fn len(&self) -> usize {
        return self.parts.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.parts.is_empty();
    }
}

impl Function for CompoundFunction {
    fn name(&self) -> &str {
        return "compound";
    }

    fn dim_y(&self) -> usize {
        return self.dim_y;
    }

    fn input_parametrization(&self) -> Parametrization {
        return self.param;
    }

    fn value(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.dim_y];
        for p in self.parts.iter() {
            for (acc, v) in y.iter_mut().zip(p.value(x)) {
                *acc += v;
            }
        }
        return y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        let f = BlinnFunction::new(Parametrization::COS_TH, &[1.0, 0.5], &[2.0, 2.0]).unwrap();
        let y = f.value(&[0.5]);
        assert!((y[0] - 0.25).abs() < 1e-12);
        assert!((y[1] - 0.125).abs() < 1e-12);
        // below the horizon the lobe vanishes
        assert_eq!(f.value(&[-0.5]), vec![0.0, 0.0]);
        assert!(BlinnFunction::new(Parametrization::CARTESIAN, &[1.0], &[2.0]).is_err());
    }

    #[test]
    fn test_002() {
        let lobe = LafortuneLobe {
            cx: -1.0,
            cy: -1.0,
            cz: 1.0,
            n: 1.0,
        };
        let f = LafortuneFunction::new(vec![vec![lobe]], 1).unwrap();
        // mirror direction pair along the normal
        let y = f.value(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert!((y[0] - 1.0).abs() < 1e-12);
        assert_eq!(f.dim_x(), 6);
    }

    #[test]
    fn test_003() {
        let a: Arc<dyn Function> = Arc::new(DiffuseFunction::new(Parametrization::COS_TH, &[0.1]));
        let b: Arc<dyn Function> =
            Arc::new(BlinnFunction::new(Parametrization::COS_TH, &[1.0], &[1.0]).unwrap());
        let c = CompoundFunction::new(vec![a, b]).unwrap();
        let y = c.value(&[0.5]);
        assert!((y[0] - 0.6).abs() < 1e-12);

        let d: Arc<dyn Function> =
            Arc::new(DiffuseFunction::new(Parametrization::CARTESIAN, &[0.1]));
        let e: Arc<dyn Function> = Arc::new(DiffuseFunction::new(Parametrization::COS_TH, &[0.1]));
        assert!(CompoundFunction::new(vec![d, e]).is_err());
    }
}
