//! Integration tests for the `studioplan` binary.

use assert_cmd::prelude::*;
use indoc::indoc;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const NOW: &str = "2024-06-30T12:00:00Z";

fn studioplan(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_studioplan"));
    cmd.current_dir(dir).env_remove("RUST_LOG").env_remove("STUDIOPLAN_DATA");
    cmd
}

fn write_export(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("export.json");
    fs::write(
        &path,
        indoc! {r#"
            {
              "tareas": [
                {"id": 1, "titulo": "Reel lanzamiento", "marca_id": 10, "cliente_id": 7,
                 "responsable": "Ana", "estado": "en-proceso", "prioridad": "urgente",
                 "fecha_creacion": "2024-06-25", "fecha_entrega": "2024-06-29T12:00:00Z"},
                {"id": 2, "title": "Carousel", "brand_id": "10", "client_id": "7",
                 "assigned_to": "Ana", "status": "delivered", "created_at": "2024-06-20",
                 "due_date": "2024-06-28", "delivered_at": "2024-06-27"},
                {"id": 3, "title": "Story", "brand_id": "10", "status": "queued", "created_at": "2024-06-26"},
                {"id": 4, "title": "Banner", "brand_id": "10", "status": "in-review", "created_at": "2024-06-26"},
                {"id": 5, "title": "Logo", "brand_id": "10", "status": "queued", "created_at": "2024-06-27"}
              ],
              "marcas": [{"id": 10, "nombre": "Acme", "cliente_id": 7}],
              "clientes": [{"id": 7, "nombre": "Acme Inc"}],
              "colaboradores": [{"id": "u1", "nombre": "Ana", "especialidad": "video"}]
            }
        "#},
    )
    .unwrap();
    path
}

#[test]
fn test_report_json_full_dashboard() {
    let dir = TempDir::new().unwrap();
    let data = write_export(dir.path());

    let assert = studioplan(dir.path())
        .args(["report", "--data", data.to_str().unwrap(), "--now", NOW, "-f", "json"])
        .assert()
        .success();

    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["summary"]["total"], 5);
    assert_eq!(report["summary"]["completed"], 1);
    assert_eq!(report["summary"]["overdue"], 1);
    assert_eq!(report["brand_limits"][0]["active_tasks"], 4);
    assert_eq!(report["brand_limits"][0]["client_name"], "Acme Inc");
    assert_eq!(report["brand_limits"][0]["over_limit"], true);
    assert_eq!(report["control"]["overdue"]["items"][0]["days_overdue"], 1);
    assert_eq!(report["control"]["urgent"]["count"], 1);
    assert_eq!(report["control"]["over_limit"]["count"], 1);
    assert_eq!(report["collaborators"][0]["name"], "Ana");
    assert_eq!(report["collaborators"][0]["on_time_percentage"], 100);
}

#[test]
fn test_report_section_and_filters() {
    let dir = TempDir::new().unwrap();
    let data = write_export(dir.path());

    let assert = studioplan(dir.path())
        .args([
            "report",
            "--data",
            data.to_str().unwrap(),
            "--now",
            NOW,
            "--status",
            "pendiente",
            "--section",
            "status",
            "--format",
            "json",
        ])
        .assert()
        .success();

    let stats: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(stats["queued"], 2);
    assert_eq!(stats["in-progress"], 0);
}

#[test]
fn test_report_markdown_to_file() {
    let dir = TempDir::new().unwrap();
    let data = write_export(dir.path());
    let out = dir.path().join("dashboard.md");

    studioplan(dir.path())
        .args([
            "report",
            "--data",
            data.to_str().unwrap(),
            "--now",
            NOW,
            "-f",
            "markdown",
            "-o",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();

    let markdown = fs::read_to_string(out).unwrap();
    assert!(markdown.contains("# Studio Dashboard"));
    assert!(markdown.contains("## Brand Limits"));
    assert!(markdown.contains("Logo (Acme) - Out of plan limit"));
}

#[test]
fn test_report_uses_discovered_config() {
    let dir = TempDir::new().unwrap();
    let data = write_export(dir.path());
    fs::write(
        dir.path().join(".studioplan.toml"),
        indoc! {r#"
            [plans.tiers.pro]
            label = "Pro"
            max_active_tasks = 10

            [plans.brands]
            "10" = "pro"

            [output]
            default_format = "json"
        "#},
    )
    .unwrap();

    let assert = studioplan(dir.path())
        .args(["report", "--data", data.to_str().unwrap(), "--now", NOW, "--section", "brands"])
        .assert()
        .success();

    let brands: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(brands[0]["plan"], "Pro");
    assert_eq!(brands[0]["limit"], 10);
    assert_eq!(brands[0]["over_limit"], false);
}

#[test]
fn test_report_directory_source() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("records");
    fs::create_dir(&records).unwrap();
    fs::write(
        records.join("tasks.json"),
        r#"[{"id": 1, "title": "Reel", "status": "requiere-atencion", "created_at": "2024-06-29"}]"#,
    )
    .unwrap();

    let assert = studioplan(dir.path())
        .args([
            "report",
            "--data",
            records.to_str().unwrap(),
            "--now",
            NOW,
            "--section",
            "control",
            "-f",
            "json",
        ])
        .assert()
        .success();

    let control: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(control["needs_attention"]["count"], 1);
    assert_eq!(control["needs_attention"]["items"][0]["reason"], "Requires attention");
}

#[test]
fn test_report_fails_on_malformed_export() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("broken.json");
    fs::write(&data, "{ not json").unwrap();

    let assert = studioplan(dir.path())
        .args(["report", "--data", data.to_str().unwrap()])
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("snapshot"));
}

#[test]
fn test_init_then_refuse_overwrite() {
    let dir = TempDir::new().unwrap();

    studioplan(dir.path()).arg("init").assert().success();
    assert!(dir.path().join(".studioplan.toml").exists());

    studioplan(dir.path()).arg("init").assert().failure();
    studioplan(dir.path()).args(["init", "--force"]).assert().success();
}
