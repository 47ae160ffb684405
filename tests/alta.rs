use pbrt_r3_plugins::alta::*;
use pbrt_r3_plugins::core::pbrt::*;
use pbrt_r3_plugins::materials::*;

use flate2::write::GzEncoder;
use flate2::Compression;
use rayon::prelude::*;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

const BLINN_FUNC: &str = "#ALTA FUNC HEADER
#CMD fit --input gold.binary
#DIM 1 3
#PARAM_IN COS_TH
#PARAM_OUT RGB_COLOR
#ALTA HEADER END

#FUNC nonlinear_function_diffuse
kd 0.05
kd -0.2
kd 0.1

#FUNC nonlinear_function_blinn
Ks 0.8
N 20
Ks 0.6
N 20
Ks -0.4
N 10
";

const ISOTROPIC_DATA: &str = "#DIM 3 1
#PARAM_IN ISOTROPIC_TV_TL_DPHI
0.0 1.0 0.0 1.0
1.0 0.0 0.0 0.0
";

fn merl_bytes(res: [i32; 3], sample: impl Fn(usize, usize) -> f64) -> Vec<u8> {
    let n = (res[0] * res[1] * res[2]) as usize;
    let mut bytes = Vec::with_capacity(12 + 24 * n);
    for r in res.iter() {
        bytes.extend_from_slice(&r.to_le_bytes());
    }
    for c in 0..3 {
        for i in 0..n {
            bytes.extend_from_slice(&sample(c, i).to_le_bytes());
        }
    }
    return bytes;
}

fn write_gz(path: &Path, bytes: &[u8]) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::fast());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap();
}

fn alta_params(filename: &Path, plugin: &str, plugin_type: &str, symmetrize: bool) -> ParamSet {
    let mut params = ParamSet::new();
    params.add_string("string filename", &filename.to_string_lossy());
    params.add_string("string plugin", plugin);
    params.add_string("string plugin-type", plugin_type);
    params.add_bool("bool symmetrize", symmetrize);
    return params;
}

fn load_brdf(filename: &Path, plugin: &str, kind: ModelKind, symmetrize: bool) -> AltaBRDF {
    let material = AltaMaterial::load(&filename.to_string_lossy(), plugin, kind, symmetrize).unwrap();
    return AltaBRDF::new(material.model(), symmetrize);
}

fn direction(theta: Float, phi: Float) -> Vector3f {
    return Vector3f::new(
        Float::sin(theta) * Float::cos(phi),
        Float::sin(theta) * Float::sin(phi),
        Float::cos(theta),
    );
}

/// Directions spread over the whole sphere, including the horizon.
fn sphere_directions() -> Vec<Vector3f> {
    let mut dirs = Vec::new();
    for i in 0..=12 {
        let theta = PI * i as Float / 12.0;
        for j in 0..8 {
            let phi = 2.0 * PI * j as Float / 8.0;
            dirs.push(direction(theta, phi));
        }
    }
    return dirs;
}

fn models(dir: &Path) -> Vec<AltaBRDF> {
    let func = dir.join("blinn.func");
    std::fs::write(&func, BLINN_FUNC).unwrap();
    let merl = dir.join("noisy.binary");
    std::fs::write(
        &merl,
        merl_bytes([4, 4, 8], |c, i| if (i + c) % 3 == 0 { -1.0 } else { 750.0 }),
    )
    .unwrap();
    let data = dir.join("isotropic.txt");
    std::fs::write(&data, ISOTROPIC_DATA).unwrap();

    return vec![
        load_brdf(&func, "", ModelKind::Function, false),
        load_brdf(&merl, "data_merl", ModelKind::Data, false),
        load_brdf(&data, "data_interpolant", ModelKind::Data, false),
        load_brdf(&data, "data_interpolant", ModelKind::Data, true),
    ];
}

#[test]
fn below_surface_is_exactly_zero() {
    let dir = tempfile::tempdir().unwrap();
    let dirs = sphere_directions();
    for brdf in models(dir.path()).iter() {
        for wo in dirs.iter() {
            for wi in dirs.iter() {
                if wo.z <= 0.0 || wi.z <= 0.0 {
                    assert_eq!(brdf.eval(wo, wi), Spectrum::zero());
                    assert_eq!(brdf.f(wo, wi), Spectrum::zero());
                }
            }
        }
    }
}

#[test]
fn negative_model_output_is_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let dirs = sphere_directions();
    let mut saw_positive = false;
    for brdf in models(dir.path()).iter() {
        for wo in dirs.iter() {
            for wi in dirs.iter() {
                let s = brdf.eval(wo, wi);
                for c in 0..3 {
                    assert!(s[c] >= 0.0);
                    saw_positive |= s[c] > 0.0;
                }
            }
        }
    }
    assert!(saw_positive);
}

#[test]
fn symmetrized_brdf_is_reciprocal() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("isotropic.txt");
    std::fs::write(&data, ISOTROPIC_DATA).unwrap();

    let up = Vector3f::new(0.0, 0.0, 1.0);
    let tilted = direction(1.0, 0.0);
    let plain = load_brdf(&data, "", ModelKind::Data, false);
    assert_eq!(plain.f(&up, &tilted)[0], 1.0);
    assert_eq!(plain.f(&tilted, &up)[0], 0.0);

    let symmetric = load_brdf(&data, "", ModelKind::Data, true);
    assert_eq!(symmetric.f(&up, &tilted)[0], 0.5);

    let lobe = |cx, cy, cz, n| LafortuneLobe { cx, cy, cz, n };
    let lafortune: Arc<dyn Function> = Arc::new(
        LafortuneFunction::new(
            vec![vec![
                lobe(-0.9, -0.4, 0.8, 12.0),
                lobe(-0.7, -0.7, 0.7, 8.0),
                lobe(0.2, -0.9, 0.6, 4.0),
            ]],
            3,
        )
        .unwrap(),
    );
    let mut brdfs = models(dir.path());
    brdfs.push(AltaBRDF::new(&BrdfModel::Function(lafortune), false));

    let dirs = sphere_directions();
    for brdf in brdfs.iter() {
        let sym = AltaBRDF::new(brdf.model(), true);
        for wo in dirs.iter().filter(|d| d.z > 0.0) {
            for wi in dirs.iter().filter(|d| d.z > 0.0) {
                assert_eq!(sym.f(wo, wi), sym.f(wi, wo));
            }
        }
    }
}

#[test]
fn merl_through_material_params() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gold.binary.gz");
    write_gz(&path, &merl_bytes([2, 2, 4], |c, _| 1500.0 * (c + 1) as f64));

    let geom = ParamSet::new();
    let mat = alta_params(&path, "data_merl", "data", false);
    let mp = TextureParams::new(&geom, &mat);
    let material = create_material("alta", &mp).unwrap();

    let p = Point3f::zero();
    let n = Normal3f::new(0.0, 0.0, 1.0);
    let mut si = SurfaceInteraction::new(
        &p,
        &Vector3f::zero(),
        &Point2f::zero(),
        &n,
        &n,
        &Vector3f::new(1.0, 0.0, 0.0),
        &Vector3f::new(0.0, 1.0, 0.0),
        &Normal3f::zero(),
        &Normal3f::zero(),
        0.0,
        0,
    );
    let mut arena = MemoryArena::new();
    material.compute_scattering_functions(&mut si, &mut arena, TransportMode::Radiance, true);
    let bsdf = si.bsdf.as_ref().unwrap();
    let s = bsdf.f(&n, &direction(0.3, 0.5), BSDF_ALL);
    assert!((s[0] - 1.0).abs() < 1e-5);
    assert!((s[1] - 2.0 * 1.15).abs() < 1e-5);
    assert!((s[2] - 3.0 * 1.66).abs() < 1e-5);
}

#[test]
fn function_file_gzip_and_plain_agree() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("blinn.func");
    let packed = dir.path().join("blinn.func.gz");
    std::fs::write(&plain, BLINN_FUNC).unwrap();
    write_gz(&packed, BLINN_FUNC.as_bytes());

    let a = load_function(&plain).unwrap();
    let b = load_function(&packed).unwrap();
    assert_eq!(a.dim_y(), 3);
    assert_eq!(a.input_parametrization(), Parametrization::COS_TH);
    for i in 0..=10 {
        let x = [i as f64 / 10.0];
        assert_eq!(a.value(&x), b.value(&x));
    }
    // at the specular peak every lobe contributes fully
    let y = a.value(&[1.0]);
    assert!((y[0] - 0.85).abs() < 1e-12);
    assert!((y[1] - 0.4).abs() < 1e-12);
    assert!((y[2] + 0.3).abs() < 1e-12);
}

#[test]
fn load_failures_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let geom = ParamSet::new();

    let missing = dir.path().join("missing.binary");
    let mat = alta_params(&missing, "data_merl", "data", false);
    assert!(create_material("alta", &TextureParams::new(&geom, &mat)).is_err());

    let unknown = dir.path().join("brdf.astm");
    std::fs::write(&unknown, "whatever").unwrap();
    let mat = alta_params(&unknown, "data_astm", "data", false);
    let e = create_material("alta", &TextureParams::new(&geom, &mat))
        .err()
        .unwrap();
    assert!(e.msg.contains("data_astm"));

    let truncated = dir.path().join("truncated.binary");
    let mut bytes = merl_bytes([2, 2, 2], |_, _| 1.0);
    bytes.truncate(40);
    std::fs::write(&truncated, bytes).unwrap();
    let mat = alta_params(&truncated, "data_merl", "data", false);
    assert!(create_material("alta", &TextureParams::new(&geom, &mat)).is_err());

    let bad_func = dir.path().join("bad.func");
    std::fs::write(&bad_func, "#DIM 1 1\n").unwrap();
    let mat = alta_params(&bad_func, "", "function", false);
    assert!(create_material("alta", &TextureParams::new(&geom, &mat)).is_err());
}

#[test]
fn shared_model_evaluates_concurrently() {
    let dir = tempfile::tempdir().unwrap();
    let func = dir.path().join("blinn.func");
    std::fs::write(&func, BLINN_FUNC).unwrap();
    let brdf = Arc::new(load_brdf(&func, "", ModelKind::Function, true));

    let dirs = sphere_directions();
    let pairs: Vec<(Vector3f, Vector3f)> = dirs
        .iter()
        .flat_map(|wo| dirs.iter().map(move |wi| (*wo, *wi)))
        .collect();
    let serial: Vec<Spectrum> = pairs.iter().map(|(wo, wi)| brdf.f(wo, wi)).collect();
    let parallel: Vec<Spectrum> = pairs.par_iter().map(|(wo, wi)| brdf.f(wo, wi)).collect();
    assert_eq!(serial, parallel);
}
