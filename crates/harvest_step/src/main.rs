use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use harvest_core::config::SimulationConfig;
use harvest_core::driver::Driver;
use harvest_core::generate;
use harvest_core::io::frame::make_frame;
use harvest_core::io::scenario::Scenario;
use harvest_core::ledger::Ledgers;
use harvest_core::presets::{ClimatePreset, CropPreset};
use harvest_core::reduce::{summarize, yearly};
use harvest_core::rng::SeedSweep;
use serde_json::json;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "harvest_step",
    about = "Batch runner for deterministic NDJSON day frames"
)]
struct Args {
    /// Path to a scenario JSON document.
    #[arg(long = "scenario", value_name = "PATH")]
    scenario_file: Option<PathBuf>,

    /// Climate preset applied on top of the scenario.
    #[arg(long)]
    climate: Option<ClimatePreset>,

    /// Crop preset applied on top of the scenario.
    #[arg(long)]
    crop: Option<CropPreset>,

    /// Override the scenario seed.
    #[arg(long, value_name = "NUMBER", allow_negative_numbers = true)]
    seed: Option<f64>,

    /// Override the number of simulated years.
    #[arg(long)]
    years: Option<u32>,

    /// Output NDJSON file path.
    #[arg(long)]
    out: PathBuf,

    /// Optional path to emit per-year summaries as NDJSON.
    #[arg(long = "emit-metrics", value_name = "PATH", conflicts_with = "sweep")]
    emit_metrics: Option<PathBuf>,

    /// Run this many derived seeds and write one summary line per seed instead of frames.
    #[arg(long, value_name = "COUNT")]
    sweep: Option<usize>,
}

fn build_config(args: &Args) -> Result<(String, SimulationConfig)> {
    let scenario = match &args.scenario_file {
        Some(path) => Scenario::load_from_path(path)
            .with_context(|| format!("failed to read scenario {:?}", path))?,
        None => Scenario {
            name: "cli".to_string(),
            ..Scenario::default()
        },
    };

    let mut config = scenario.build_config();
    if let Some(preset) = args.climate {
        config = config.with_climate(preset);
    }
    if let Some(preset) = args.crop {
        config = config.with_crop(preset);
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(years) = args.years {
        config.year_count = years;
    }
    Ok((scenario.name, config))
}

fn write_line<W: Write>(writer: &mut W, value: &serde_json::Value) -> Result<()> {
    let serialized = serde_json::to_string(value)?;
    writer.write_all(serialized.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn run_frames(args: &Args, config: SimulationConfig, out: &mut impl Write) -> Result<()> {
    // Ledgers are only buffered when per-year metrics were requested.
    let mut metrics = match &args.emit_metrics {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create metrics file at {:?}", path))?;
            Some((BufWriter::new(file), Ledgers::default()))
        }
        None => None,
    };

    for outcome in Driver::new(config) {
        for entry in &outcome.chronicle {
            info!(target: "chronicle", code = %entry.code, day = entry.day_index, note = ?entry.note);
        }
        if let Some((_, ledgers)) = metrics.as_mut() {
            ledgers.climate.push(outcome.climate.clone());
            ledgers.food.extend(outcome.food.iter().cloned());
            ledgers.population.push(outcome.population.clone());
        }
        let line = make_frame(outcome).to_ndjson()?;
        out.write_all(line.as_bytes())?;
    }

    if let Some((writer, ledgers)) = metrics.as_mut() {
        for year in yearly(ledgers) {
            write_line(writer, &json!({ "year": year.year, "global": year }))?;
        }
        writer.flush()?;
    }
    Ok(())
}

fn run_sweep(
    name: &str,
    config: &SimulationConfig,
    count: usize,
    out: &mut impl Write,
) -> Result<()> {
    let mut sweep = SeedSweep::new(name, config.seed);
    for seed in sweep.take_seeds(count) {
        let generation = generate(&config.clone().with_seed(seed));
        let summary = summarize(&generation);
        info!(seed, final_population = summary.final_population, "sweep run complete");
        write_line(out, &json!({ "seed": seed, "summary": summary }))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let (name, config) = build_config(&args)?;
    let warnings = config
        .validate()
        .with_context(|| format!("scenario {name:?} is not runnable"))?;
    for warning in &warnings {
        warn!(%warning, "scenario validation");
    }

    let out_file =
        File::create(&args.out).with_context(|| format!("failed to create {:?}", args.out))?;
    let mut out_writer = BufWriter::new(out_file);

    match args.sweep {
        Some(count) => run_sweep(&name, &config, count, &mut out_writer)?,
        None => run_frames(&args, config, &mut out_writer)?,
    }
    out_writer.flush()?;

    info!(scenario = %name, out = ?args.out, "run complete");
    Ok(())
}
