use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use repro::Record;
use worldgen::TerrainQuery;

#[derive(Parser, Debug)]
#[command(name = "repro_harness", about = "Regenerate a recorded terrain and check it")]
struct Args {
    #[arg(long)]
    record: String,
    #[arg(long)]
    assert_hash: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let rec = Record::read_from_path(&args.record)
        .with_context(|| format!("reading record {}", args.record))?;

    let got = rec.hash_hex().context("hashing record")?;
    if let Some(expected_path) = args.assert_hash {
        let expected = std::fs::read_to_string(&expected_path)
            .with_context(|| format!("reading hash file {expected_path}"))?
            .trim()
            .to_string();
        if got != expected {
            bail!("hash mismatch:\n got: {got}\n exp: {expected}");
        }
    }

    let terrain = rec.verify().context("regenerating recorded terrain")?;
    if terrain.min_height() != rec.min_height || terrain.max_height() != rec.max_height {
        bail!(
            "bounds mismatch: recorded [{}, {}], regenerated [{}, {}]",
            rec.min_height,
            rec.max_height,
            terrain.min_height(),
            terrain.max_height()
        );
    }
    info!("record {} reproduces, hash {got}", args.record);
    Ok(())
}
