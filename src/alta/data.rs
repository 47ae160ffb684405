use super::params::*;
use crate::core::error::*;

use std::path::Path;

/// A measured BRDF data set, loaded by a data plugin.
pub trait Data: Send + Sync {
    fn name(&self) -> &str;

    fn load(&mut self, path: &Path) -> Result<(), PbrtError>;

    fn dim_x(&self) -> usize {
        return self.input_parametrization().dimension();
    }

    fn dim_y(&self) -> usize;

    fn input_parametrization(&self) -> Parametrization;

    /// Number of stored samples.
    fn size(&self) -> usize;

    /// Reconstructs the data set at `x`, given in `input_parametrization()`.
    fn value(&self, x: &[f64]) -> Vec<f64>;
}
