use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use worldgen::{Terrain, TerrainError, TerrainParams, TerrainQuery};

pub mod goldens;

pub const RECORD_SCHEMA: u32 = 1;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("failed to parse seed list: {0}")]
    Seeds(#[from] toml::de::Error),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error("unsupported record schema {0}")]
    Schema(u32),
    #[error("grid digest mismatch: recorded {expected}, regenerated {got}")]
    DigestMismatch { expected: String, got: String },
}

/// Everything needed to regenerate a terrain, plus what it should look like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub schema: u32,
    pub params: TerrainParams,
    pub cells: usize,
    pub min_height: f32,
    pub max_height: f32,
    pub grid_digest: String,
}

impl Record {
    pub fn capture(terrain: &Terrain) -> Self {
        Self {
            schema: RECORD_SCHEMA,
            params: *terrain.params(),
            cells: terrain.grid().len(),
            min_height: terrain.min_height(),
            max_height: terrain.max_height(),
            grid_digest: grid_digest(terrain.grid().heights()),
        }
    }

    pub fn generate(params: &TerrainParams) -> Result<Self, RecordError> {
        Ok(Self::capture(&Terrain::generate(params)?))
    }

    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        let mut text = canonical_json(self)?;
        text.push('\n');
        Ok(text)
    }

    pub fn hash_hex(&self) -> Result<String, serde_json::Error> {
        let bytes = canonical_json_bytes(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let raw = fs::read_to_string(path)?;
        let record: Record = serde_json::from_str(&raw)?;
        if record.schema != RECORD_SCHEMA {
            return Err(RecordError::Schema(record.schema));
        }
        Ok(record)
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.canonical_json()?)?;
        Ok(())
    }

    /// Regenerates the terrain and checks it against the recorded digest.
    pub fn verify(&self) -> Result<Terrain, RecordError> {
        let terrain = Terrain::generate(&self.params)?;
        let got = grid_digest(terrain.grid().heights());
        if got != self.grid_digest {
            return Err(RecordError::DigestMismatch {
                expected: self.grid_digest.clone(),
                got,
            });
        }
        Ok(terrain)
    }
}

/// blake3 over the little-endian bit patterns of every height, row-major.
pub fn grid_digest(heights: &[f32]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(heights.len() as u64).to_le_bytes());
    for height in heights {
        hasher.update(&height.to_bits().to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let sorted = sort_json_value(serde_json::to_value(value)?);
    serde_json::to_string(&sorted)
}

/// Canonical JSON followed by a newline, one record per line.
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut bytes = canonical_json(value)?.into_bytes();
    bytes.push(b'\n');
    Ok(bytes)
}

fn sort_json_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut items = map.into_iter().collect::<Vec<_>>();
            items.sort_by(|(a, _), (b, _)| a.cmp(b));
            let mut sorted = serde_json::Map::new();
            for (k, v) in items {
                sorted.insert(k, sort_json_value(v));
            }
            serde_json::Value::Object(sorted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(sort_json_value).collect())
        }
        _ => value,
    }
}
