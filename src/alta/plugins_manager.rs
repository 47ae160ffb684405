use super::data::*;
use super::function::*;
use super::function_file::*;
use super::interpolant::*;
use super::merl::*;
use crate::core::error::*;

use std::path::Path;
use std::sync::Arc;

/// Names accepted by `get_data`.
pub const DATA_PLUGINS: [&str; 2] = ["data_merl", "data_interpolant"];

/// Returns an empty data object for the named plugin. An empty name selects
/// the text interpolant.
pub fn get_data(plugin: &str) -> Result<Box<dyn Data>, PbrtError> {
    match plugin {
        "data_merl" | "merl" => Ok(Box::new(MerlData::new())),
        "" | "data_interpolant" | "interpolant" => Ok(Box::new(InterpolantData::new())),
        _ => {
            let msg = format!("data plugin \"{}\" unknown.", plugin);
            Err(PbrtError::error(&msg))
        }
    }
}

/// Creates the named data plugin and loads `path` into it.
pub fn load_data(plugin: &str, path: &Path) -> Result<Arc<dyn Data>, PbrtError> {
    let mut data = get_data(plugin)?;
    data.load(path)?;
    return Ok(Arc::from(data));
}

/// Loads a function file. The plugins are named inside the file itself.
pub fn load_function(path: &Path) -> Result<Arc<dyn Function>, PbrtError> {
    return load_function_file(path);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        assert_eq!(get_data("data_merl").unwrap().name(), "data_merl");
        assert_eq!(get_data("").unwrap().name(), "data_interpolant");
        assert!(get_data("data_astm").is_err());
    }

    #[test]
    fn test_002() {
        assert!(load_data("data_merl", Path::new("/nonexistent/gold.binary")).is_err());
        assert!(load_function(Path::new("/nonexistent/gold.func")).is_err());
    }
}
