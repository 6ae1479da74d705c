//! Golden terrains: a named seed list in TOML and one record/hash pair per
//! name on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use worldgen::TerrainParams;

use crate::{Record, RecordError};

pub type SeedSpecs = BTreeMap<String, TerrainParams>;

pub fn load_seed_specs(path: impl AsRef<Path>) -> Result<SeedSpecs, RecordError> {
    let raw = fs::read_to_string(path)?;
    parse_seed_specs(&raw)
}

pub fn parse_seed_specs(raw: &str) -> Result<SeedSpecs, RecordError> {
    let specs: SeedSpecs = toml::from_str(raw)?;
    for params in specs.values() {
        params.validate()?;
    }
    Ok(specs)
}

pub fn record_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("terrain_{name}.json"))
}

pub fn hash_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("terrain_{name}.hash"))
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoldenStatus {
    Match,
    Missing { computed: String },
    Mismatch { expected: String, computed: String },
}

pub fn write_golden(dir: &Path, name: &str, record: &Record) -> Result<String, RecordError> {
    record.write_to_path(record_path(dir, name))?;
    let hash = record.hash_hex()?;
    fs::write(hash_path(dir, name), format!("{hash}\n"))?;
    info!("golden terrain {name} written hash={hash}");
    Ok(hash)
}

pub fn check_golden(dir: &Path, name: &str, record: &Record) -> Result<GoldenStatus, RecordError> {
    let computed = record.hash_hex()?;
    let path = hash_path(dir, name);
    if !path.exists() {
        return Ok(GoldenStatus::Missing { computed });
    }
    let expected = fs::read_to_string(path)?.trim().to_string();
    if expected == computed {
        Ok(GoldenStatus::Match)
    } else {
        Ok(GoldenStatus::Mismatch { expected, computed })
    }
}
