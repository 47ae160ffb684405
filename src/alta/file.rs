use crate::core::error::*;

use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;

fn is_gzip(path: &Path) -> bool {
    return path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);
}

/// Reads a whole model file, inflating it first when the name ends in `.gz`.
pub fn read_model_bytes(path: &Path) -> Result<Vec<u8>, PbrtError> {
    let file = std::fs::File::open(path).map_err(|e| {
        let msg = format!("{}: {}", path.display(), e);
        PbrtError::error(&msg)
    })?;
    let mut reader = std::io::BufReader::new(file);
    let mut bytes = Vec::new();
    if is_gzip(path) {
        GzDecoder::new(reader).read_to_end(&mut bytes)?;
    } else {
        reader.read_to_end(&mut bytes)?;
    }
    return Ok(bytes);
}

pub fn read_model_text(path: &Path) -> Result<String, PbrtError> {
    let bytes = read_model_bytes(path)?;
    return String::from_utf8(bytes).map_err(|_| {
        let msg = format!("{}: not a text file", path.display());
        PbrtError::error(&msg)
    });
}
