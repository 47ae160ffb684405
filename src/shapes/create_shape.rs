use super::*;

use crate::core::error::*;
use crate::core::param_set::*;
use crate::core::shape::*;

use std::sync::Arc;

/// Builds the shapes named by a `Shape` directive. Geometry is given directly
/// in world space.
pub fn create_shapes(
    name: &str,
    reverse_orientation: bool,
    params: &ParamSet,
) -> Result<Vec<Arc<dyn Shape>>, PbrtError> {
    let mut shapes: Vec<Arc<dyn Shape>> = Vec::new();
    match name {
        "sphere" => {
            let s = create_sphere_shape(reverse_orientation, params)?;
            shapes.push(Arc::new(s));
        }
        "trianglemesh" => {
            let vertex_indices: Vec<u32> = match params.get_ints_ref("indices") {
                Some(v) => v.iter().map(|i| *i as u32).collect(),
                None => {
                    return Err(PbrtError::error(
                        "Vertex indices \"indices\" not provided with triangle mesh shape",
                    ));
                }
            };
            let p = params.find_point3fs("P");
            if p.is_empty() {
                return Err(PbrtError::error(
                    "Vertex positions \"P\" not provided with triangle mesh shape",
                ));
            }
            let n = params.find_point3fs("N");
            let uv = match params.get_floats_ref("uv") {
                Some(v) => v
                    .chunks_exact(2)
                    .map(|c| crate::core::pbrt::Point2f::new(c[0], c[1]))
                    .collect(),
                None => Vec::new(),
            };
            let mut mesh = create_triangle_mesh(
                reverse_orientation,
                vertex_indices,
                p,
                n,
                uv,
                params,
            )?;
            shapes.append(&mut mesh);
        }
        "plymesh" => {
            let mut mesh = create_ply_mesh(reverse_orientation, params)?;
            shapes.append(&mut mesh);
        }
        _ => {
            let msg = format!("Shape \"{}\" unknown.", name);
            return Err(PbrtError::warning(&msg));
        }
    }
    return Ok(shapes);
}
