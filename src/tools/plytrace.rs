use clap::*;

use pbrt_r3_plugins::accelerators::*;
use pbrt_r3_plugins::core::pbrt::*;
use pbrt_r3_plugins::shapes::*;

use indicatif::*;
use rayon::prelude::*;
use std::env;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

use log::*;

#[derive(Debug, Parser)]
#[clap(author, about = "Casts an orthographic grid of rays at a PLY mesh", version)]
struct CommandOptions {
    /// Input .ply file.
    #[arg(value_name = "filename.ply")]
    pub plyfile: PathBuf,

    /// Ray tracing kernel: "embree" or "software".
    #[arg(short, long, value_name = "name")]
    pub kernel: Option<String>,

    /// Policy for primitives that are not triangles.
    #[arg(long, default_value = "fallback", value_name = "fallback|skip|error")]
    pub nontriangles: String,

    /// Leaf size of the software kernel.
    #[arg(long, default_value = "4", value_name = "num")]
    pub maxprimsinnode: usize,

    /// Image resolution.
    #[arg(long, default_value = "256", value_name = "num")]
    pub width: u32,

    #[arg(long, default_value = "256", value_name = "num")]
    pub height: u32,

    /// Write a depth image to the given filename.
    #[arg(short, long, value_name = "filename")]
    pub outfile: Option<PathBuf>,

    /// Suppress all text output other than error messages.
    #[clap(long, default_value = "false")]
    pub quiet: bool,

    /// Log messages at or above this level (0 -> INFO,
    /// 1 -> WARNING, 2 -> ERROR, 3-> FATAL).
    #[arg(long, value_name = "num")]
    pub minloglevel: Option<i32>,
}

fn init_logger(opts: &CommandOptions) {
    if let Some(minloglevel) = opts.minloglevel {
        const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        let log_level = LOG_LEVELS[(minloglevel + 2).clamp(0, 4) as usize];
        env::set_var("RUST_LOG", log_level);
    } else {
        //default log level : warn
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_owned());
        env::set_var("RUST_LOG", log_level);
    }

    env_logger::Builder::from_default_env()
        .format_target(false)
        .format_module_path(false)
        .init();
}

fn progress_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    let template = "{spinner:.bold.green} Tracing: [{wide_bar:.cyan}]  ({elapsed_precise}|{eta_precise}) ";
    if let Ok(style) = ProgressStyle::with_template(template) {
        pb.set_style(style.progress_chars("█▇▆▅▄▃▂▁  "));
    }
    pb.tick();
    return pb;
}

fn build_accel(opts: &CommandOptions) -> Result<EmbreeAccel, PbrtError> {
    let mut params = ParamSet::new();
    params.add_string("string filename", &opts.plyfile.to_string_lossy());
    let shapes = create_shapes("plymesh", false, &params)?;
    let prims: Vec<Arc<dyn Primitive>> = shapes
        .iter()
        .map(|s| -> Arc<dyn Primitive> { Arc::new(GeometricPrimitive::new(s, &None)) })
        .collect();

    let kernel_name = match opts.kernel.as_ref() {
        Some(k) => k.clone(),
        None if cfg!(feature = "embree") => "embree".to_string(),
        None => "software".to_string(),
    };
    let kernel = create_kernel(&kernel_name, "", opts.maxprimsinnode.max(1))?;
    let policy = NonTrianglePolicy::from_str(&opts.nontriangles)?;
    return EmbreeAccel::new(&prims, kernel.as_ref(), policy);
}

fn trace(accel: &EmbreeAccel, opts: &CommandOptions) -> (Vec<Option<Float>>, usize) {
    let bounds = accel.world_bound();
    let extent = bounds.diagonal();
    let (w, h) = (opts.width.max(1), opts.height.max(1));
    let z0 = bounds.max.z + 1.0;
    let pb = progress_bar(h as u64, opts.quiet);

    let rows: Vec<Vec<Option<Float>>> = (0..h)
        .into_par_iter()
        .map(|y| {
            let row = (0..w)
                .map(|x| {
                    let px = bounds.min.x + (x as Float + 0.5) / w as Float * extent.x;
                    let py = bounds.max.y - (y as Float + 0.5) / h as Float * extent.y;
                    let r = Ray::new(
                        &Point3f::new(px, py, z0),
                        &Vector3f::new(0.0, 0.0, -1.0),
                        Float::INFINITY,
                        0.0,
                    );
                    accel.intersect(&r).map(|_| r.t_max.get() - 1.0)
                })
                .collect();
            pb.inc(1);
            row
        })
        .collect();
    pb.finish();

    let depths: Vec<Option<Float>> = rows.into_iter().flatten().collect();
    let hits = depths.iter().filter(|d| d.is_some()).count();
    return (depths, hits);
}

fn write_depth(
    depths: &[Option<Float>],
    extent_z: Float,
    opts: &CommandOptions,
    path: &Path,
) -> Result<(), PbrtError> {
    let scale = if extent_z > 0.0 { 1.0 / extent_z } else { 1.0 };
    let pixels: Vec<u8> = depths
        .iter()
        .map(|d| match d {
            // near is bright, misses are black
            Some(d) => (255.0 * (1.0 - (d * scale).clamp(0.0, 1.0))).round() as u8,
            None => 0,
        })
        .collect();
    let img = image::GrayImage::from_raw(opts.width.max(1), opts.height.max(1), pixels)
        .ok_or_else(|| PbrtError::error("depth image size mismatch"))?;
    img.save(path).map_err(|e| {
        let msg = format!("{}: {}", path.display(), e);
        PbrtError::error(&msg)
    })?;
    return Ok(());
}

fn run(opts: &CommandOptions) -> Result<(), PbrtError> {
    let accel = build_accel(opts)?;
    if !opts.quiet {
        println!(
            "{}: kernel {}, {} triangles, {} fallback, {} skipped",
            opts.plyfile.display(),
            accel.kernel_name(),
            accel.geometry_count(),
            accel.fallback_count(),
            accel.skipped_count()
        );
    }
    let (depths, hits) = trace(&accel, opts);
    if !opts.quiet {
        println!("{} of {} rays hit", hits, depths.len());
    }
    if let Some(path) = opts.outfile.as_ref() {
        let extent_z = accel.world_bound().diagonal().z;
        write_depth(&depths, extent_z, opts, path)?;
    }
    return Ok(());
}

fn main() {
    let opts = CommandOptions::parse();
    init_logger(&opts);

    if let Err(e) = run(&opts) {
        error!("{}", e);
        eprintln!("{}", e);
        process::exit(1);
    }
}
