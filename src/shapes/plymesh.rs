use super::triangle::*;
use crate::core::error::*;
use crate::core::param_set::*;
use crate::core::pbrt::*;

use std::path::Path;
use std::sync::Arc;

use ply_rs::parser;
use ply_rs::ply;

const VERTEX_P: u32 = 1;
const VERTEX_N: u32 = 2;
const VERTEX_UV: u32 = 8;

#[derive(Debug, Default)]
struct Vertex {
    x: f32,
    y: f32,
    z: f32,
    nx: f32,
    ny: f32,
    nz: f32,
    u: f32,
    v: f32,
    flags: u32,
}

#[derive(Debug, Default)]
struct Face {
    vertex_index: Vec<i64>,
}

fn property_as_f32(property: &ply::Property) -> Option<f32> {
    match property {
        ply::Property::Float(v) => Some(*v),
        ply::Property::Double(v) => Some(*v as f32),
        _ => None,
    }
}

impl ply::PropertyAccess for Vertex {
    fn new() -> Self {
        Vertex::default()
    }

    fn set_property(&mut self, key: String, property: ply::Property) {
        // Unknown or non-float vertex properties (colors, confidence...) are ignored
        let v = match property_as_f32(&property) {
            Some(v) => v,
            None => return,
        };
        match key.as_str() {
            "x" => {
                self.x = v;
                self.flags |= VERTEX_P;
            }
            "y" => {
                self.y = v;
                self.flags |= VERTEX_P;
            }
            "z" => {
                self.z = v;
                self.flags |= VERTEX_P;
            }
            "nx" => {
                self.nx = v;
                self.flags |= VERTEX_N;
            }
            "ny" => {
                self.ny = v;
                self.flags |= VERTEX_N;
            }
            "nz" => {
                self.nz = v;
                self.flags |= VERTEX_N;
            }
            "u" | "s" | "texture_u" | "texture_s" => {
                self.u = v;
                self.flags |= VERTEX_UV;
            }
            "v" | "t" | "texture_v" | "texture_t" => {
                self.v = v;
                self.flags |= VERTEX_UV;
            }
            _ => {}
        }
    }
}

impl ply::PropertyAccess for Face {
    fn new() -> Self {
        Face::default()
    }

    fn set_property(&mut self, key: String, property: ply::Property) {
        if key != "vertex_indices" && key != "vertex_index" {
            return;
        }
        match property {
            ply::Property::ListInt(vec) => {
                self.vertex_index = vec.iter().map(|i| *i as i64).collect();
            }
            ply::Property::ListUInt(vec) => {
                self.vertex_index = vec.iter().map(|i| *i as i64).collect();
            }
            ply::Property::ListShort(vec) => {
                self.vertex_index = vec.iter().map(|i| *i as i64).collect();
            }
            ply::Property::ListUShort(vec) => {
                self.vertex_index = vec.iter().map(|i| *i as i64).collect();
            }
            ply::Property::ListUChar(vec) => {
                self.vertex_index = vec.iter().map(|i| *i as i64).collect();
            }
            _ => {}
        }
    }
}

/// Raw indexed triangle data read from a PLY file.
#[derive(Debug, Default, Clone)]
pub struct PlyData {
    pub vertex_indices: Vec<u32>,
    pub p: Vec<Point3f>,
    pub n: Vec<Normal3f>,
    pub uv: Vec<Point2f>,
}

fn triangulate(face: &Face, nverts: usize, out: &mut Vec<u32>) -> Result<(), PbrtError> {
    if let Some(bad) = face
        .vertex_index
        .iter()
        .find(|i| **i < 0 || **i as usize >= nverts)
    {
        let msg = format!("plymesh: vertex index {} out of range", bad);
        return Err(PbrtError::error(&msg));
    }
    let idx: Vec<u32> = face.vertex_index.iter().map(|i| *i as u32).collect();
    match idx.len() {
        3 => out.extend_from_slice(&idx),
        4 => out.extend_from_slice(&[idx[0], idx[1], idx[2], idx[3], idx[0], idx[2]]),
        n => {
            let msg = format!(
                "plymesh: Ignoring face with {} vertices (only triangles and quads are supported!)",
                n
            );
            return Err(PbrtError::error(&msg));
        }
    }
    return Ok(());
}

pub fn read_ply<P: AsRef<Path>>(path: P) -> Result<PlyData, PbrtError> {
    let f = std::fs::File::open(path.as_ref()).map_err(|e| {
        let msg = format!("plymesh: {}: {}", path.as_ref().display(), e);
        PbrtError::error(&msg)
    })?;
    let mut reader = std::io::BufReader::new(f);
    let vertex_parser = parser::Parser::<Vertex>::new();
    let face_parser = parser::Parser::<Face>::new();
    let header = vertex_parser.read_header(&mut reader)?;

    let mut data = PlyData::default();
    for (_name, element) in header.elements.iter() {
        match element.name.as_ref() {
            "vertex" => {
                let vertex_list =
                    vertex_parser.read_payload_for_element(&mut reader, element, &header)?;
                let flags = vertex_list.first().map(|v| v.flags).unwrap_or(0);
                if (flags & VERTEX_P) != 0 {
                    data.p = vertex_list
                        .iter()
                        .map(|v| Point3f::new(v.x as Float, v.y as Float, v.z as Float))
                        .collect();
                }
                if (flags & VERTEX_N) != 0 {
                    data.n = vertex_list
                        .iter()
                        .map(|v| Normal3f::new(v.nx as Float, v.ny as Float, v.nz as Float))
                        .collect();
                }
                if (flags & VERTEX_UV) != 0 {
                    data.uv = vertex_list
                        .iter()
                        .map(|v| Point2f::new(v.u as Float, v.v as Float))
                        .collect();
                }
            }
            "face" => {
                let face_list = face_parser.read_payload_for_element(&mut reader, element, &header)?;
                data.vertex_indices.reserve(face_list.len() * 3);
                for face in face_list.iter() {
                    triangulate(face, data.p.len(), &mut data.vertex_indices)?;
                }
            }
            _ => {
                // Skipping an element requires parsing it; read it as vertices and drop it
                let _ = vertex_parser.read_payload_for_element(&mut reader, element, &header)?;
            }
        }
    }
    if data.p.is_empty() {
        return Err(PbrtError::error("plymesh: no vertex positions found"));
    }
    return Ok(data);
}

pub fn create_ply_mesh(
    reverse_orientation: bool,
    params: &ParamSet,
) -> Result<Vec<Arc<dyn Shape>>, PbrtError> {
    let filename = params.find_one_filename("filename", "");
    if filename.is_empty() {
        return Err(PbrtError::error("plymesh: \"filename\" is required"));
    }
    let data = read_ply(&filename)?;
    log::info!(
        "plymesh: {}: {} vertices, {} triangles",
        filename,
        data.p.len(),
        data.vertex_indices.len() / 3
    );
    return create_triangle_mesh(
        reverse_orientation,
        data.vertex_indices,
        data.p,
        data.n,
        data.uv,
        params,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_001() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let ply = "ply\n\
format ascii 1.0\n\
element vertex 4\n\
property float x\n\
property float y\n\
property float z\n\
element face 1\n\
property list uchar int vertex_indices\n\
end_header\n\
0 0 0\n\
1 0 0\n\
1 1 0\n\
0 1 0\n\
4 0 1 2 3\n";
        file.write_all(ply.as_bytes()).unwrap();
        file.flush().unwrap();
        let data = read_ply(file.path()).unwrap();
        assert_eq!(data.p.len(), 4);
        assert_eq!(data.vertex_indices, vec![0, 1, 2, 3, 0, 2]);

        let mut params = ParamSet::new();
        params.add_string("filename", &file.path().to_string_lossy());
        let shapes = create_ply_mesh(false, &params).unwrap();
        assert_eq!(shapes.len(), 2);
    }

    #[test]
    fn test_002() {
        let r = read_ply("/nonexistent/mesh.ply");
        assert!(r.is_err());
    }
}
