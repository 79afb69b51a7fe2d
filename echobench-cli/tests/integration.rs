use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

#[test]
fn templates_list_shows_builtins() {
    let mut cmd = Command::cargo_bin("echobench").unwrap();

    let assert = cmd.args(["templates", "list", "--format", "json"]).assert();
    let output = assert.success().get_output().stdout.clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let ids: Vec<&str> = parsed["templates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"openai"));
    assert!(ids.contains(&"deepgram"));
}

#[test]
fn templates_list_accepts_an_overlay_file() {
    let tmp_dir = TempDir::new().unwrap();
    let overlay = tmp_dir.path().join("extra.json");
    fs::write(
        &overlay,
        r#"[{"id":"acme","name":"Acme","url":"https://api.acme.example","auth_scheme":"bearer"}]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("echobench").unwrap();
    let assert = cmd
        .args([
            "templates",
            "list",
            "--templates",
            overlay.to_str().unwrap(),
            "--format",
            "json",
        ])
        .assert();
    let output = assert.success().get_output().stdout.clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let templates = parsed["templates"].as_array().unwrap();
    assert!(templates.iter().any(|t| t["id"] == "acme"));
}

#[test]
fn templates_export_round_trips_the_overlay() {
    let tmp_dir = TempDir::new().unwrap();
    let overlay = tmp_dir.path().join("extra.json");
    fs::write(
        &overlay,
        r#"[{"id":"acme","name":"Acme","url":"https://api.acme.example","auth_scheme":"bearer"}]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("echobench").unwrap();
    let assert = cmd
        .args(["templates", "export", "--templates", overlay.to_str().unwrap()])
        .assert();
    let output = assert.success().get_output().stdout.clone();
    let exported: Vec<serde_json::Value> = serde_json::from_slice(&output).unwrap();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0]["id"], "acme");
}

#[test]
fn templates_import_reports_skipped_entries() {
    let tmp_dir = TempDir::new().unwrap();
    let file = tmp_dir.path().join("mixed.json");
    fs::write(
        &file,
        r#"[
            {"id":"acme","name":"Acme","url":"https://api.acme.example","auth_scheme":"bearer"},
            {"id":"openai","name":"Impostor","url":"https://evil.example","auth_scheme":"bearer"},
            {"id":"","name":"nameless","auth_scheme":"bearer"}
        ]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("echobench").unwrap();
    let assert = cmd
        .args(["templates", "import", file.to_str().unwrap(), "--format", "json"])
        .assert();
    let output = assert.success().get_output().stdout.clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["imported"], 1);
    assert_eq!(parsed["skipped"], 2);
}

#[test]
fn malformed_overlay_is_a_usage_error() {
    let tmp_dir = TempDir::new().unwrap();
    let overlay = tmp_dir.path().join("broken.json");
    fs::write(&overlay, "not json").unwrap();

    let mut cmd = Command::cargo_bin("echobench").unwrap();
    cmd.args(["templates", "list", "--templates", overlay.to_str().unwrap()])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn run_requires_at_least_one_input() {
    let mut cmd = Command::cargo_bin("echobench").unwrap();
    cmd.args(["run", "--vendor", "env-openai"])
        .assert()
        .failure()
        .code(2);
}
