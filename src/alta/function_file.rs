use super::file::*;
use super::function::*;
use super::params::*;
use crate::core::error::*;

use nom::bytes::complete::take_while1;
use nom::character::complete::{char, not_line_ending, space0, space1};
use nom::combinator::all_consuming;
use nom::number::complete::double;
use nom::sequence::{pair, preceded, terminated};
use nom::IResult;

use log::*;
use std::path::Path;
use std::sync::Arc;

/// `#ALTA FUNC HEADER` section of a function file.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionHeader {
    pub dim_x: usize,
    pub dim_y: usize,
    pub param_in: Parametrization,
}

/// One `#FUNC <plugin>` block with its directives and named parameters in
/// file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionBlock {
    pub plugin: String,
    pub nb_lobes: usize,
    pub values: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionFile {
    pub header: FunctionHeader,
    pub blocks: Vec<FunctionBlock>,
}

fn is_name_char(c: char) -> bool {
    return c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.';
}

/// `#KEY rest-of-line`
fn directive(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        char('#'),
        pair(take_while1(is_name_char), preceded(space0, not_line_ending)),
    )(input)
}

/// `name value`
fn named_value(input: &str) -> IResult<&str, (&str, f64)> {
    all_consuming(terminated(
        pair(take_while1(is_name_char), preceded(space1, double)),
        space0,
    ))(input)
}

fn parse_dim(rest: &str, line_no: usize) -> Result<(usize, usize), PbrtError> {
    let dims: Vec<&str> = rest.split_whitespace().collect();
    if dims.len() != 2 {
        let msg = format!("line {}: #DIM expects two integers", line_no);
        return Err(PbrtError::error(&msg));
    }
    let nx = dims[0].parse::<usize>()?;
    let ny = dims[1].parse::<usize>()?;
    return Ok((nx, ny));
}

/// Parses the text of an ALTA function file.
pub fn parse_function_file(text: &str) -> Result<FunctionFile, PbrtError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    match lines.next() {
        Some((_, l)) if l.starts_with("#ALTA") && l.contains("FUNC") => {}
        _ => {
            return Err(PbrtError::error("missing \"#ALTA FUNC HEADER\""));
        }
    }

    let mut dim = None;
    let mut param_in = None;
    let mut header_closed = false;
    for (line_no, line) in lines.by_ref() {
        let (_, (key, rest)) = directive(line)?;
        match key {
            "DIM" => dim = Some(parse_dim(rest, line_no)?),
            "PARAM_IN" => param_in = Some(rest.trim().parse::<Parametrization>()?),
            "ALTA" if rest.contains("END") => {
                header_closed = true;
                break;
            }
            _ => {
                debug!("function file: ignoring header line {}: {}", line_no, line);
            }
        }
    }
    if !header_closed {
        return Err(PbrtError::error("missing \"#ALTA HEADER END\""));
    }
    let (dim_x, dim_y) = dim.ok_or_else(|| PbrtError::error("missing #DIM"))?;
    let param_in = param_in.ok_or_else(|| PbrtError::error("missing #PARAM_IN"))?;
    if param_in.dimension() != dim_x {
        let msg = format!(
            "#DIM declares {} inputs but {} has {}",
            dim_x,
            param_in,
            param_in.dimension()
        );
        return Err(PbrtError::error(&msg));
    }
    let header = FunctionHeader {
        dim_x,
        dim_y,
        param_in,
    };

    let mut blocks: Vec<FunctionBlock> = Vec::new();
    for (line_no, line) in lines {
        if line.starts_with('#') {
            let (_, (key, rest)) = directive(line)?;
            match key {
                "FUNC" => blocks.push(FunctionBlock {
                    plugin: rest.trim().to_string(),
                    ..Default::default()
                }),
                "NB_LOBES" => {
                    let block = blocks.last_mut().ok_or_else(|| {
                        let msg = format!("line {}: #NB_LOBES outside of #FUNC", line_no);
                        PbrtError::error(&msg)
                    })?;
                    block.nb_lobes = rest.trim().parse::<usize>()?;
                }
                _ => {
                    debug!("function file: ignoring line {}: {}", line_no, line);
                }
            }
            continue;
        }
        let block = blocks.last_mut().ok_or_else(|| {
            let msg = format!("line {}: parameter outside of #FUNC", line_no);
            PbrtError::error(&msg)
        })?;
        let (_, (name, value)) = named_value(line).map_err(|_| {
            let msg = format!("line {}: expected \"name value\", got \"{}\"", line_no, line);
            PbrtError::error(&msg)
        })?;
        block.values.push((name.to_string(), value));
    }
    if blocks.is_empty() {
        return Err(PbrtError::error("no #FUNC block"));
    }
    return Ok(FunctionFile { header, blocks });
}

struct ValueReader<'a> {
    plugin: &'a str,
    values: &'a [(String, f64)],
    pos: usize,
}

impl<'a> ValueReader<'a> {
    fn new(block: &'a FunctionBlock) -> Self {
        ValueReader {
            plugin: &block.plugin,
            values: &block.values,
            pos: 0,
        }
    }

    fn take(&mut self, name: &str) -> Result<f64, PbrtError> {
        match self.values.get(self.pos) {
            Some((n, v)) if n == name => {
                self.pos += 1;
                return Ok(*v);
            }
            Some((n, _)) => {
                let msg = format!("{}: expected \"{}\", got \"{}\"", self.plugin, name, n);
                return Err(PbrtError::error(&msg));
            }
            None => {
                let msg = format!("{}: missing \"{}\"", self.plugin, name);
                return Err(PbrtError::error(&msg));
            }
        }
    }

    fn finish(&self) -> Result<(), PbrtError> {
        if self.pos != self.values.len() {
            let msg = format!(
                "{}: {} unexpected parameters",
                self.plugin,
                self.values.len() - self.pos
            );
            return Err(PbrtError::error(&msg));
        }
        return Ok(());
    }
}

/// Instantiates the plugin named by `block` with the header's dimensions.
pub fn create_function(
    header: &FunctionHeader,
    block: &FunctionBlock,
) -> Result<Arc<dyn Function>, PbrtError> {
    let mut reader = ValueReader::new(block);
    let ny = header.dim_y;
    let f: Arc<dyn Function> = match block.plugin.as_str() {
        "nonlinear_function_diffuse" => {
            let kd = (0..ny)
                .map(|_| reader.take("kd"))
                .collect::<Result<Vec<f64>, PbrtError>>()?;
            Arc::new(DiffuseFunction::new(header.param_in, &kd))
        }
        "nonlinear_function_blinn" => {
            let mut ks = Vec::with_capacity(ny);
            let mut n = Vec::with_capacity(ny);
            for _ in 0..ny {
                ks.push(reader.take("Ks")?);
                n.push(reader.take("N")?);
            }
            Arc::new(BlinnFunction::new(header.param_in, &ks, &n)?)
        }
        "nonlinear_function_lafortune" => {
            if header.param_in != Parametrization::CARTESIAN {
                let msg = format!(
                    "nonlinear_function_lafortune: requires CARTESIAN input, got {}",
                    header.param_in
                );
                return Err(PbrtError::error(&msg));
            }
            let nb_lobes = block.nb_lobes.max(1);
            let mut lobes = Vec::with_capacity(nb_lobes);
            for _ in 0..nb_lobes {
                let mut lobe = Vec::with_capacity(ny);
                for _ in 0..ny {
                    lobe.push(LafortuneLobe {
                        cx: reader.take("Cx")?,
                        cy: reader.take("Cy")?,
                        cz: reader.take("Cz")?,
                        n: reader.take("N")?,
                    });
                }
                lobes.push(lobe);
            }
            Arc::new(LafortuneFunction::new(lobes, ny)?)
        }
        _ => {
            let msg = format!("function plugin \"{}\" unknown.", block.plugin);
            return Err(PbrtError::error(&msg));
        }
    };
    reader.finish()?;
    return Ok(f);
}

/// Loads a function file, summing its blocks when there is more than one.
pub fn load_function_file(path: &Path) -> Result<Arc<dyn Function>, PbrtError> {
    let text = read_model_text(path)?;
    let file = parse_function_file(&text).map_err(|e| {
        let msg = format!("{}: {}", path.display(), e.msg);
        PbrtError::new(e.kind, &msg)
    })?;
    let mut parts = file
        .blocks
        .iter()
        .map(|b| create_function(&file.header, b))
        .collect::<Result<Vec<_>, PbrtError>>()?;
    info!(
        "function file {}: {} block(s), {} -> {}",
        path.display(),
        parts.len(),
        file.header.param_in,
        file.header.dim_y
    );
    if parts.len() == 1 {
        if let Some(f) = parts.pop() {
            return Ok(f);
        }
    }
    return Ok(Arc::new(CompoundFunction::new(parts)?));
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLINN: &str = "#ALTA FUNC HEADER
#CMD fit --input data.txt
#DIM 1 3
#PARAM_IN COS_TH
#PARAM_OUT RGB_COLOR
#ALTA HEADER END

#FUNC nonlinear_function_diffuse
kd 0.1
kd 0.2
kd 0.3

#FUNC nonlinear_function_blinn
Ks 1.0
N 2.0
Ks 0.5
N 2.0
Ks 0.0
N 1.0
";

    #[test]
    fn test_001() {
        let file = parse_function_file(BLINN).unwrap();
        assert_eq!(file.header.dim_x, 1);
        assert_eq!(file.header.dim_y, 3);
        assert_eq!(file.header.param_in, Parametrization::COS_TH);
        assert_eq!(file.blocks.len(), 2);
        assert_eq!(file.blocks[1].plugin, "nonlinear_function_blinn");
        assert_eq!(file.blocks[1].values[0], ("Ks".to_string(), 1.0));
    }

    #[test]
    fn test_002() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blinn.func");
        std::fs::write(&path, BLINN).unwrap();
        let f = load_function_file(&path).unwrap();
        assert_eq!(f.dim_y(), 3);
        let y = f.value(&[0.5]);
        assert!((y[0] - 0.35).abs() < 1e-12);
        assert!((y[1] - 0.325).abs() < 1e-12);
        assert!((y[2] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_003() {
        let text = "#ALTA FUNC HEADER
#DIM 6 1
#PARAM_IN CARTESIAN
#ALTA HEADER END
#FUNC nonlinear_function_lafortune
#NB_LOBES 2
Cx -1
Cy -1
Cz 1
N 1
Cx 0
Cy 0
Cz 0.5
N 1
";
        let file = parse_function_file(text).unwrap();
        assert_eq!(file.blocks[0].nb_lobes, 2);
        let f = create_function(&file.header, &file.blocks[0]).unwrap();
        let y = f.value(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert!((y[0] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_004() {
        // unknown plugin
        let text = "#ALTA FUNC HEADER\n#DIM 1 1\n#PARAM_IN COS_TH\n#ALTA HEADER END\n#FUNC nonlinear_function_ward\nkd 1\n";
        let file = parse_function_file(text).unwrap();
        assert!(create_function(&file.header, &file.blocks[0]).is_err());
        // missing header end
        assert!(parse_function_file("#ALTA FUNC HEADER\n#DIM 1 1\n").is_err());
        // dimension mismatch
        let text = "#ALTA FUNC HEADER\n#DIM 2 1\n#PARAM_IN COS_TH\n#ALTA HEADER END\n#FUNC nonlinear_function_diffuse\nkd 1\n";
        assert!(parse_function_file(text).is_err());
        // wrong parameter count
        let text = "#ALTA FUNC HEADER\n#DIM 1 2\n#PARAM_IN COS_TH\n#ALTA HEADER END\n#FUNC nonlinear_function_diffuse\nkd 1\n";
        let file = parse_function_file(text).unwrap();
        assert!(create_function(&file.header, &file.blocks[0]).is_err());
    }
}
