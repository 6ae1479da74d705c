use std::fs;

use worldgen::{load_terrain_cfg, ConfigError, Terrain, TerrainQuery};

#[test]
fn terrain_config_rejects_unknown_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(
        &path,
        r#"
[terrain]
resolution = 4
terrain_length = 32.0
max_height = 5.0
height_decay_rate = 0.5
roughness = 2.0
"#,
    )
    .expect("write config");

    let result = load_terrain_cfg(&path);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn missing_config_is_a_read_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = load_terrain_cfg(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Read(_))));
}

#[test]
fn shipped_default_config_generates() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../assets/terrain/default.toml");
    let cfg = load_terrain_cfg(path).expect("default config");
    let terrain = Terrain::generate(&cfg.params().expect("params")).expect("terrain");
    assert_eq!(terrain.partitions(), 1usize << cfg.terrain.resolution);
    assert!(terrain.side_length() > 0.0);
}
