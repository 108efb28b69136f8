//! Runs the `tilemosaic` binary against temporary mosaic files.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const FOOTPRINTS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"path": "west.tif"},
     "geometry": {"type": "Polygon", "coordinates": [[[-10, 40], [-1, 40], [-1, 50], [-10, 50], [-10, 40]]]}},
    {"type": "Feature", "properties": {"path": "east.tif"},
     "geometry": {"type": "Polygon", "coordinates": [[[1, 40], [10, 40], [10, 50], [1, 50], [1, 40]]]}}
  ]
}"#;

const UPDATE: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"path": "patch.tif"},
     "geometry": {"type": "Polygon", "coordinates": [[[-6, 44], [-4, 44], [-4, 46], [-6, 46], [-6, 44]]]}}
  ]
}"#;

fn tilemosaic(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tilemosaic"))
        .args(args)
        .env("HOME", home)
        .env_remove("TILEMOSAIC_CACHE_TTL")
        .env_remove("TILEMOSAIC_CACHE_MAXSIZE")
        .env_remove("TILEMOSAIC_CACHE_DISABLE")
        .output()
        .expect("failed to run tilemosaic")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn setup() -> (TempDir, String, String) {
    let temp = TempDir::new().unwrap();
    let footprints = temp.path().join("footprints.geojson");
    std::fs::write(&footprints, FOOTPRINTS).unwrap();
    let mosaic = temp.path().join("mosaic.json");

    let output = tilemosaic(
        temp.path(),
        &[
            "create",
            footprints.to_str().unwrap(),
            "--output",
            mosaic.to_str().unwrap(),
            "--minzoom",
            "3",
            "--maxzoom",
            "12",
            "--quadkey-zoom",
            "6",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    (
        temp,
        footprints.to_str().unwrap().to_string(),
        mosaic.to_str().unwrap().to_string(),
    )
}

#[test]
fn test_create_then_info() {
    let (temp, _, mosaic) = setup();

    let output = tilemosaic(temp.path(), &["info", &mosaic, "--quadkeys"]);
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(info["version"], "1.0.0");
    assert_eq!(info["minzoom"], 3);
    assert!(!info["quadkeys"].as_array().unwrap().is_empty());
    assert_eq!(info["mosaic_id"].as_str().unwrap().len(), 56);
}

#[test]
fn test_create_refuses_to_overwrite() {
    let (temp, footprints, mosaic) = setup();

    let output = tilemosaic(temp.path(), &["create", &footprints, "--output", &mosaic]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_point_and_bbox_queries() {
    let (temp, _, mosaic) = setup();

    let output = tilemosaic(temp.path(), &["assets", &mosaic, "point", "-5", "45"]);
    assert!(output.status.success());
    let assets: Vec<String> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(assets, vec!["west.tif"]);

    let output = tilemosaic(
        temp.path(),
        &["assets", &mosaic, "bbox", "-9", "41", "9", "49"],
    );
    assert!(output.status.success());
    let assets: Vec<String> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(assets.len(), 2);
    assert!(assets.contains(&"west.tif".to_string()));
    assert!(assets.contains(&"east.tif".to_string()));
}

#[test]
fn test_update_puts_new_assets_first() {
    let (temp, _, mosaic) = setup();
    let update = temp.path().join("update.geojson");
    std::fs::write(&update, UPDATE).unwrap();

    let output = tilemosaic(temp.path(), &["update", &mosaic, update.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = tilemosaic(temp.path(), &["assets", &mosaic, "point", "-5", "45"]);
    let assets: Vec<String> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(assets, vec!["patch.tif", "west.tif"]);

    let output = tilemosaic(temp.path(), &["info", &mosaic]);
    let info: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(info["version"], "1.0.1");
}
