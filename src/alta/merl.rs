use super::data::*;
use super::file::*;
use super::params::*;
use crate::core::error::*;

use log::*;
use nom::multi::count;
use nom::number::complete::{le_f64, le_i32};
use nom::sequence::tuple;
use nom::IResult;

use std::f64::consts::PI;
use std::path::Path;

const RED_SCALE: f64 = 1.0 / 1500.0;
const GREEN_SCALE: f64 = 1.15 / 1500.0;
const BLUE_SCALE: f64 = 1.66 / 1500.0;

/// Resolution of the published MERL tables.
pub const MERL_RES: [usize; 3] = [90, 90, 180];

/// Tabulated isotropic BRDF in the MERL binary layout: three `i32`
/// resolutions `(theta_h, theta_d, phi_d)` then every red sample, every
/// green sample and every blue sample as little-endian `f64`.
#[derive(Debug, Clone, Default)]
pub struct MerlData {
    res: [usize; 3],
    samples: Vec<f64>,
}

fn parse_header(input: &[u8]) -> IResult<&[u8], (i32, i32, i32)> {
    tuple((le_i32, le_i32, le_i32))(input)
}

fn parse_samples(input: &[u8], n: usize) -> IResult<&[u8], Vec<f64>> {
    count(le_f64, n)(input)
}

fn index(x: f64, scale: f64, res: usize) -> usize {
    if x.is_nan() || x <= 0.0 {
        return 0;
    }
    return usize::min((x * scale) as usize, res - 1);
}

impl MerlData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PbrtError> {
        let (rest, (nth, ntd, npd)) = parse_header(bytes)?;
        if nth <= 0 || ntd <= 0 || npd <= 0 {
            let msg = format!("merl: bad resolution {} x {} x {}", nth, ntd, npd);
            return Err(PbrtError::error(&msg));
        }
        let res = [nth as usize, ntd as usize, npd as usize];
        let count = res[0]
            .checked_mul(res[1])
            .and_then(|n| n.checked_mul(res[2]))
            .and_then(|n| n.checked_mul(3));
        let count = count.ok_or_else(|| PbrtError::error("merl: resolution overflows"))?;
        let nbytes = count
            .checked_mul(8)
            .ok_or_else(|| PbrtError::error("merl: resolution overflows"))?;
        if rest.len() < nbytes {
            let msg = format!(
                "merl: expected {} samples, file holds {}",
                count,
                rest.len() / 8
            );
            return Err(PbrtError::error(&msg));
        }
        let (_rest, samples) = parse_samples(rest, count)?;
        if res != MERL_RES {
            warn!(
                "merl: non-standard resolution {} x {} x {}",
                res[0], res[1], res[2]
            );
        }
        return Ok(MerlData { res, samples });
    }

    pub fn resolution(&self) -> [usize; 3] {
        return self.res;
    }

    /// Flat index of the bin holding `(theta_h, theta_d, phi_d)`.
    pub fn lookup(&self, theta_h: f64, theta_d: f64, phi_d: f64) -> usize {
        let [nth, ntd, npd] = self.res;
        // theta_h bins are denser near the specular peak
        let th = if theta_h > 0.0 {
            usize::min(
                (f64::sqrt(theta_h / (0.5 * PI)) * nth as f64) as usize,
                nth - 1,
            )
        } else {
            0
        };
        let td = index(theta_d, ntd as f64 / (0.5 * PI), ntd);
        // reciprocity: phi_d and phi_d + pi share a bin
        let mut pd = phi_d % PI;
        if pd < 0.0 {
            pd += PI;
        }
        let pd = index(pd, npd as f64 / PI, npd);
        return pd + npd * (td + ntd * th);
    }
}

impl Data for MerlData {
    fn name(&self) -> &str {
        return "data_merl";
    }

    fn load(&mut self, path: &Path) -> Result<(), PbrtError> {
        let bytes = read_model_bytes(path)?;
        *self = Self::from_bytes(&bytes).map_err(|e| {
            let msg = format!("{}: {}", path.display(), e.msg);
            PbrtError::new(e.kind, &msg)
        })?;
        info!(
            "merl: {}: {} x {} x {} samples",
            path.display(),
            self.res[0],
            self.res[1],
            self.res[2]
        );
        return Ok(());
    }

    fn dim_y(&self) -> usize {
        return 3;
    }

    fn input_parametrization(&self) -> Parametrization {
        return Parametrization::RUSIN_TH_TD_PD;
    }

    fn size(&self) -> usize {
        return self.samples.len() / 3;
    }

    fn value(&self, x: &[f64]) -> Vec<f64> {
        let n = self.size();
        if n == 0 {
            return vec![0.0; 3];
        }
        let i = self.lookup(x[0], x[1], x[2]);
        return vec![
            self.samples[i] * RED_SCALE,
            self.samples[i + n] * GREEN_SCALE,
            self.samples[i + 2 * n] * BLUE_SCALE,
        ];
    }
}
