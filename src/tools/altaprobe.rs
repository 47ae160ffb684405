use clap::*;

use pbrt_r3_plugins::alta::*;
use pbrt_r3_plugins::core::pbrt::*;
use pbrt_r3_plugins::materials::*;

use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::process;

use log::*;

#[derive(Debug, Parser)]
#[clap(author, about = "Evaluates a BRDF model in the plane of incidence", version)]
struct CommandOptions {
    /// Model file (ALTA function file or data file).
    #[arg(value_name = "filename")]
    pub filename: PathBuf,

    /// Data plugin name, used with --plugin-type data.
    #[arg(short, long, default_value = "")]
    pub plugin: String,

    /// "data" loads a measured data set, anything else a function file.
    #[arg(short = 't', long = "plugin-type", default_value = "")]
    pub plugin_type: String,

    /// Average f(wo, wi) and f(wi, wo).
    #[arg(long, default_value = "false")]
    pub symmetrize: bool,

    /// Number of angular samples per axis over [0, 90) degrees.
    #[arg(short = 'n', long, default_value = "18", value_name = "num")]
    pub steps: usize,

    /// Write the table to the given filename instead of standard output.
    #[arg(short, long, value_name = "filename")]
    pub outfile: Option<PathBuf>,

    /// Log messages at or above this level (0 -> INFO,
    /// 1 -> WARNING, 2 -> ERROR, 3-> FATAL).
    #[arg(long, value_name = "num")]
    pub minloglevel: Option<i32>,
}

#[derive(Debug, Serialize)]
struct ProbeTable {
    model: String,
    parametrization: String,
    channels: usize,
    symmetrize: bool,
    /// Degrees.
    theta_in: Vec<f64>,
    /// Degrees.
    theta_out: Vec<f64>,
    /// values[i][o] = [r, g, b]
    values: Vec<Vec<[f32; 3]>>,
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

fn probe(opts: &CommandOptions) -> Result<ProbeTable, PbrtError> {
    let filename = opts.filename.to_string_lossy();
    let kind = ModelKind::from_plugin_type(&opts.plugin_type);
    let material = AltaMaterial::load(&filename, &opts.plugin, kind, opts.symmetrize)?;
    let brdf = AltaBRDF::new(material.model(), opts.symmetrize);

    let steps = opts.steps.max(1);
    let angles: Vec<f64> = (0..steps)
        .map(|i| 90.0 * i as f64 / steps as f64)
        .collect();
    let mut values = Vec::with_capacity(steps);
    for theta_in in angles.iter() {
        let ti = theta_in.to_radians();
        // light arrives from -x, the view leaves towards +x
        let wi = Vector3f::new(-f64::sin(ti) as Float, 0.0, f64::cos(ti) as Float);
        let row = angles
            .iter()
            .map(|theta_out| {
                let to = theta_out.to_radians();
                let wo = Vector3f::new(f64::sin(to) as Float, 0.0, f64::cos(to) as Float);
                brdf.f(&wo, &wi).to_rgb()
            })
            .collect();
        values.push(row);
    }
    info!("altaprobe: {} x {} samples", steps, steps);

    let model = material.model();
    return Ok(ProbeTable {
        model: model.name().to_string(),
        parametrization: model.input_parametrization().to_string(),
        channels: model.dim_y(),
        symmetrize: opts.symmetrize,
        theta_in: angles.clone(),
        theta_out: angles,
        values,
    });
}

fn write_table(table: &ProbeTable, opts: &CommandOptions) -> Result<(), PbrtError> {
    let json = serde_json::to_string_pretty(table).map_err(|e| PbrtError::error(&e.to_string()))?;
    match opts.outfile.as_ref() {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{}", json),
    }
    return Ok(());
}

fn main() {
    let opts = CommandOptions::parse();
    init_logger(&opts);

    let r = probe(&opts).and_then(|table| write_table(&table, &opts));
    if let Err(e) = r {
        error!("{}", e);
        eprintln!("{}", e);
        process::exit(1);
    }
}
