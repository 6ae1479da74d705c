use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde_json::json;

use repro::goldens::{check_golden, load_seed_specs, write_golden, GoldenStatus};
use repro::Record;
use worldgen::config::ViewCfg;
use worldgen::{load_terrain_cfg, Regenerator, Terrain, TerrainQuery, TerrainSlot};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match &args.seeds {
        Some(seeds) => run_goldens(&args, seeds),
        None => run_config(&args),
    }
}

fn run_goldens(args: &Args, seeds: &Path) -> Result<()> {
    let specs = load_seed_specs(seeds)
        .with_context(|| format!("loading seed list from {}", seeds.display()))?;
    let mut mismatches = 0usize;
    for (name, params) in &specs {
        let record = Record::generate(params)
            .with_context(|| format!("generating golden terrain {name}"))?;
        if !args.check {
            write_golden(&args.out, name, &record)
                .with_context(|| format!("writing golden terrain {name}"))?;
            continue;
        }
        match check_golden(&args.out, name, &record)? {
            GoldenStatus::Match => info!("{name}: ok"),
            GoldenStatus::Missing { computed } => {
                warn!("{name}: no golden hash on disk, computed {computed}")
            }
            GoldenStatus::Mismatch { expected, computed } => {
                warn!("{name}: expected {expected}, computed {computed}");
                mismatches += 1;
            }
        }
    }
    if mismatches > 0 {
        bail!("{mismatches} golden terrain(s) changed");
    }
    Ok(())
}

fn run_config(args: &Args) -> Result<()> {
    let cfg = load_terrain_cfg(&args.config)
        .with_context(|| format!("loading terrain config from {}", args.config.display()))?;
    let params = args.apply_overrides(cfg.params()?);
    params.validate().context("validating terrain parameters")?;

    let slot = TerrainSlot::generate(&params).context("generating terrain")?;
    write_outputs(args, &args.name, &slot.current(), &cfg.view)?;

    let mut regen = Regenerator::new(params);
    for _ in 0..args.regenerations {
        let terrain = regen.regenerate(&slot).context("regenerating terrain")?;
        let name = format!("{}_gen{:03}", args.name, regen.generation());
        write_outputs(args, &name, &terrain, &cfg.view)?;
    }
    Ok(())
}

fn write_outputs(args: &Args, name: &str, terrain: &Terrain, view: &ViewCfg) -> Result<()> {
    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    let record = Record::capture(terrain);
    let hash = write_golden(&args.out, name, &record)?;

    let water = view.water_height.unwrap_or_else(|| terrain.waterline());
    let vantage = terrain.vantage(view.clearance, water);
    let summary = json!({
        "name": name,
        "seed": terrain.params().seed,
        "resolution": terrain.params().resolution,
        "partitions": terrain.partitions(),
        "side_length": terrain.side_length(),
        "min_height": terrain.min_height(),
        "max_height": terrain.max_height(),
        "water_height": water,
        "vantage": {
            "position": vantage.position,
            "pitch_degrees": vantage.pitch_degrees,
            "yaw_degrees": vantage.yaw_degrees,
        },
        "record_hash": hash,
    });
    let summary_path = args.out.join(format!("{name}.summary.json"));
    fs::write(&summary_path, repro::canonical_json_bytes(&summary)?)
        .with_context(|| format!("writing {}", summary_path.display()))?;

    if args.mesh {
        let mesh_path = args.out.join(format!("{name}.mesh.json"));
        let mesh = serde_json::to_vec(&terrain.mesh())?;
        fs::write(&mesh_path, mesh).with_context(|| format!("writing {}", mesh_path.display()))?;
        info!("mesh written to {}", mesh_path.display());
    }

    info!(
        "{name}: min={:.3} max={:.3} water={:.3} hash={hash}",
        terrain.min_height(),
        terrain.max_height(),
        water
    );
    Ok(())
}
