use super::data::*;
use super::function::*;
use super::params::*;
use super::plugins_manager::*;
use crate::core::error::*;

use std::path::Path;
use std::sync::Arc;

/// Where a model comes from: a measured data set or a fitted function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Data,
    Function,
}

impl ModelKind {
    /// `"data"` selects measured data, anything else a function file.
    pub fn from_plugin_type(plugin_type: &str) -> Self {
        if plugin_type == "data" {
            return ModelKind::Data;
        }
        return ModelKind::Function;
    }
}

/// A loaded BRDF model, queried in its own input parametrization.
#[derive(Clone)]
pub enum BrdfModel {
    Data(Arc<dyn Data>),
    Function(Arc<dyn Function>),
}

impl std::fmt::Debug for BrdfModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrdfModel")
            .field("name", &self.name())
            .field("param_in", &self.input_parametrization())
            .field("dim_y", &self.dim_y())
            .finish()
    }
}

impl BrdfModel {
    pub fn load(kind: ModelKind, filename: &str, plugin: &str) -> Result<Self, PbrtError> {
        let path = Path::new(filename);
        match kind {
            ModelKind::Data => Ok(BrdfModel::Data(load_data(plugin, path)?)),
            ModelKind::Function => Ok(BrdfModel::Function(load_function(path)?)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BrdfModel::Data(d) => d.name(),
            BrdfModel::Function(f) => f.name(),
        }
    }

    pub fn dim_x(&self) -> usize {
        match self {
            BrdfModel::Data(d) => d.dim_x(),
            BrdfModel::Function(f) => f.dim_x(),
        }
    }

    pub fn dim_y(&self) -> usize {
        match self {
            BrdfModel::Data(d) => d.dim_y(),
            BrdfModel::Function(f) => f.dim_y(),
        }
    }

    pub fn input_parametrization(&self) -> Parametrization {
        match self {
            BrdfModel::Data(d) => d.input_parametrization(),
            BrdfModel::Function(f) => f.input_parametrization(),
        }
    }

    pub fn value(&self, x: &[f64]) -> Vec<f64> {
        match self {
            BrdfModel::Data(d) => d.value(x),
            BrdfModel::Function(f) => f.value(x),
        }
    }

    /// Evaluates the model for a light direction `wi` and view direction
    /// `wo`, both unit vectors in the local shading frame.
    pub fn value_cartesian(&self, wi: &[f64; 3], wo: &[f64; 3]) -> Result<Vec<f64>, PbrtError> {
        let cart = [wi[0], wi[1], wi[2], wo[0], wo[1], wo[2]];
        let mut x = [0.0; 6];
        convert(
            &cart,
            Parametrization::CARTESIAN,
            self.input_parametrization(),
            &mut x,
        )?;
        return Ok(self.value(&x[..self.dim_x()]));
    }
}
