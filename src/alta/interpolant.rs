use super::data::*;
use super::file::*;
use super::params::*;
use crate::core::error::*;

use log::*;
use nom::character::complete::{space0, space1};
use nom::combinator::all_consuming;
use nom::multi::separated_list1;
use nom::number::complete::double;
use nom::sequence::terminated;
use nom::IResult;

use std::path::Path;

/// Scattered samples from an ALTA text data file, reconstructed by nearest
/// neighbour lookup in the input space.
#[derive(Debug, Clone)]
pub struct InterpolantData {
    dim_x: usize,
    dim_y: usize,
    param_in: Parametrization,
    // rows of dim_x inputs followed by dim_y outputs
    rows: Vec<Vec<f64>>,
}

impl Default for InterpolantData {
    fn default() -> Self {
        InterpolantData {
            dim_x: 0,
            dim_y: 0,
            param_in: Parametrization::CARTESIAN,
            rows: Vec::new(),
        }
    }
}

fn row(input: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(terminated(separated_list1(space1, double), space0))(input)
}

fn check_dimension(dim_x: usize, param: &Parametrization) -> Result<(), PbrtError> {
    if param.dimension() != dim_x {
        let msg = format!(
            "#DIM declares {} inputs but {} has {}",
            dim_x,
            param,
            param.dimension()
        );
        return Err(PbrtError::error(&msg));
    }
    return Ok(());
}

impl InterpolantData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, PbrtError> {
        let mut dim = None;
        let mut param_in = None;
        let mut rows = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(directive) = line.strip_prefix('#') {
                let mut it = directive.split_whitespace();
                match it.next() {
                    Some("DIM") => {
                        let nx = it.next().unwrap_or("").parse::<usize>()?;
                        let ny = it.next().unwrap_or("").parse::<usize>()?;
                        if nx.checked_add(ny).is_none() {
                            let msg = format!("line {}: #DIM {} {} is too large", i + 1, nx, ny);
                            return Err(PbrtError::error(&msg));
                        }
                        dim = Some((nx, ny));
                    }
                    Some("PARAM_IN") => {
                        param_in = Some(it.next().unwrap_or("").parse::<Parametrization>()?);
                    }
                    _ => {}
                }
                continue;
            }
            let (nx, ny) = dim.ok_or_else(|| PbrtError::error("data before #DIM"))?;
            if let Some(param) = param_in.as_ref() {
                check_dimension(nx, param)?;
            }
            let (_, values) = row(line).map_err(|_| {
                let msg = format!("line {}: expected numbers, got \"{}\"", i + 1, line);
                PbrtError::error(&msg)
            })?;
            if values.len() < nx + ny {
                let msg = format!(
                    "line {}: expected {} values, got {}",
                    i + 1,
                    nx + ny,
                    values.len()
                );
                return Err(PbrtError::error(&msg));
            }
            // vertical segment bounds, when present, follow and are dropped
            rows.push(values[..nx + ny].to_vec());
        }
        let (dim_x, dim_y) = dim.ok_or_else(|| PbrtError::error("missing #DIM"))?;
        let param_in = param_in.ok_or_else(|| PbrtError::error("missing #PARAM_IN"))?;
        check_dimension(dim_x, &param_in)?;
        if rows.is_empty() {
            return Err(PbrtError::error("no samples"));
        }
        return Ok(InterpolantData {
            dim_x,
            dim_y,
            param_in,
            rows,
        });
    }
}

impl Data for InterpolantData {
    fn name(&self) -> &str {
        return "data_interpolant";
    }

    fn load(&mut self, path: &Path) -> Result<(), PbrtError> {
        let text = read_model_text(path)?;
        *self = Self::parse(&text).map_err(|e| {
            let msg = format!("{}: {}", path.display(), e.msg);
            PbrtError::new(e.kind, &msg)
        })?;
        info!(
            "data_interpolant: {}: {} samples, {} -> {}",
            path.display(),
            self.rows.len(),
            self.param_in,
            self.dim_y
        );
        return Ok(());
    }

    fn dim_y(&self) -> usize {
        return self.dim_y;
    }

    fn input_parametrization(&self) -> Parametrization {
        return self.param_in;
    }

    fn size(&self) -> usize {
        return self.rows.len();
    }

    fn value(&self, x: &[f64]) -> Vec<f64> {
        let nx = self.dim_x;
        let nearest = self.rows.iter().min_by(|a, b| {
            let da: f64 = a[..nx].iter().zip(x).map(|(p, q)| (p - q) * (p - q)).sum();
            let db: f64 = b[..nx].iter().zip(x).map(|(p, q)| (p - q) * (p - q)).sum();
            da.total_cmp(&db)
        });
        match nearest {
            Some(r) => r[nx..].to_vec(),
            None => vec![0.0; self.dim_y],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "#DIM 1 3
#PARAM_IN COS_TH
#PARAM_OUT RGB_COLOR
1.0 0.9 0.8 0.7
0.5 0.3 0.2 0.1
0.0 0.0 0.0 0.0
";

    #[test]
    fn test_001() {
        let data = InterpolantData::parse(DATA).unwrap();
        assert_eq!(data.size(), 3);
        assert_eq!(data.dim_x(), 1);
        assert_eq!(data.dim_y(), 3);
        assert_eq!(data.value(&[0.95]), vec![0.9, 0.8, 0.7]);
        assert_eq!(data.value(&[0.6]), vec![0.3, 0.2, 0.1]);
    }

    #[test]
    fn test_002() {
        assert!(InterpolantData::parse("#PARAM_IN COS_TH\n1 2\n").is_err());
        assert!(InterpolantData::parse("#DIM 1 3\n#PARAM_IN COS_TH\n1 2\n").is_err());
        assert!(InterpolantData::parse("#DIM 1 1\n#PARAM_IN COS_TH\n1 abc\n").is_err());
        assert!(InterpolantData::parse("#DIM 1 1\n#PARAM_IN COS_TH\n").is_err());
    }

    #[test]
    fn test_003() {
        let huge = format!("#DIM {} 1\n#PARAM_IN COS_TH\n1 2\n", usize::MAX);
        let err = InterpolantData::parse(&huge).unwrap_err();
        assert!(err.msg.contains("too large"), "{}", err.msg);
        let wrong = "#DIM 2 1\n#PARAM_IN COS_TH\n1 2 3\n";
        let err = InterpolantData::parse(wrong).unwrap_err();
        assert!(err.msg.contains("#DIM declares 2"), "{}", err.msg);
    }
}
