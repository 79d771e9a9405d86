//! Running the generator against template and config files on disk.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use descent_cli::{RunParams, read_config, run, write_structure};

fn room(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "dungeon": { "min": [0, 0, 0], "max": [4, 2, 4] },
        "openings": [
            { "min": [0, 1, 2], "max": [0, 1, 2] },
            { "min": [4, 1, 2], "max": [4, 1, 2] },
            { "min": [2, 1, 0], "max": [2, 1, 0] },
            { "min": [2, 1, 4], "max": [2, 1, 4] },
        ],
        "blocks": [{ "position": [2, 1, 2], "block": "torch" }],
    })
}

fn write(dir: &Path, name: &str, value: &serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Writes templates and a config into a fresh directory.
fn setup(config: &serde_json::Value) -> (tempfile::TempDir, RunParams) {
    let dir = tempfile::tempdir().unwrap();
    let templates = dir.path().join("templates");
    fs::create_dir(&templates).unwrap();
    write(
        &templates,
        "hall.json",
        &serde_json::json!({
            "id": "hall",
            "dungeon": { "min": [0, 0, 0], "max": [0, 0, 0] },
            "openings": [{ "min": [0, 0, 0], "max": [0, 0, 0] }],
        }),
    );
    for id in ["start", "end", "vault"] {
        write(&templates, &format!("{id}.json"), &room(id));
    }
    write(dir.path(), "config.json", config);

    let params = RunParams {
        templates,
        config: dir.path().join("config.json"),
        seed: 12,
    };
    (dir, params)
}

fn config() -> serde_json::Value {
    serde_json::json!({
        "starts": [{ "id": "start" }],
        "ends": [{ "id": "end" }],
        "rooms": [{ "id": "vault" }],
        "paths": ["hall"],
        "numberOfRooms": 4,
        "minSeparation": [2, 1, 2],
    })
}

#[test]
fn generates_and_writes_structure() {
    let (dir, params) = setup(&config());
    let dungeon = run(&params).unwrap();
    let output = dir.path().join("out.json");
    write_structure(&dungeon.structure, Some(&output)).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let placements = written["placements"].as_array().unwrap();
    assert_eq!(placements.len(), 4 + dungeon.corridors.len());
    assert_eq!(placements[2]["role"], "start");
    assert_eq!(placements[3]["role"], "end");
    let torches = written["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["block"] == "torch")
        .count();
    assert_eq!(torches, 4);
}

#[test]
fn same_seed_same_output() {
    let (dir, params) = setup(&config());
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    write_structure(&run(&params).unwrap().structure, Some(&a)).unwrap();
    write_structure(&run(&params).unwrap().structure, Some(&b)).unwrap();
    assert_eq!(fs::read_to_string(a).unwrap(), fs::read_to_string(b).unwrap());
}

#[test]
fn missing_template_is_named() {
    let mut config = config();
    config["rooms"] = serde_json::json!([{ "id": "crypt" }]);
    let (_dir, params) = setup(&config);
    let error = run(&params).unwrap_err();
    let message = format!("{error:#}");
    assert!(
        message.ends_with("template crypt does not exist"),
        "{message}"
    );
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = config();
    config["numberOfRooms"] = 1.into();
    let (_dir, params) = setup(&config);
    let error = read_config(&params.config).unwrap_err();
    assert!(format!("{error:#}").starts_with("invalid config in "));
}

#[test]
fn unparseable_config_is_rejected() {
    let (_dir, params) = setup(&serde_json::json!({ "starts": "start" }));
    let error = run(&params).unwrap_err();
    assert!(format!("{error:#}").starts_with("failed to parse config file "));
}

#[test]
fn missing_config_file() {
    let (dir, mut params) = setup(&config());
    params.config = dir.path().join("nowhere.json");
    let error = run(&params).unwrap_err();
    assert!(format!("{error:#}").starts_with("failed to open config file "));
}
