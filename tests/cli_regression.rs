// Regression tests for the zgoubidoo binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

const BEAMLINE: &str = r#"
name: cli_line
line:
  - LABEL1: D1
    Drift: { XL: 1 m }
  - LABEL1: Q1
    Quadrupole: { XL: 40 cm, R0: 10 cm, B0: 0.5 T }
  - Marker: {}
beam:
  particle: proton
  brho: 1.5 T*m
  distribution:
    - { Y: 0.001 }
    - { Y: 0.002 }
    - { Y: 0.003 }
  slicing: { count: 2 }
"#;

const UNBEAMED: &str = r#"
name: no_objet
line:
  - Drift: { XL: 1 m }
"#;

fn description(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn write_generates_one_file_per_slice() {
    let dir = tempfile::tempdir().unwrap();
    let file = description(dir.path(), "line.yaml", BEAMLINE);
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("zgoubidoo").unwrap();
    cmd.arg("write").arg(&file).arg("--out").arg(&out);
    cmd.assert().success().stdout(contains("Written"));

    let first = fs::read_to_string(out.join("zgoubi_0.dat")).unwrap();
    assert!(first.starts_with("cli_line\n 'OBJET'\n"));
    assert!(first.contains("'PARTICUL'"));
    assert!(out.join("zgoubi_1.dat").exists());
    assert!(!out.join("zgoubi_2.dat").exists());
}

#[test]
fn cli_reports_miette_diagnostics_on_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let file = description(dir.path(), "bad.yaml", UNBEAMED);

    let mut cmd = Command::cargo_bin("zgoubidoo").unwrap();
    cmd.arg("write").arg(&file).arg("-o").arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(contains("zgoubidoo::input").or(contains("help:")));
    assert!(!dir.path().join("zgoubi.dat").exists());
}

#[test]
fn no_validate_writes_anyway() {
    let dir = tempfile::tempdir().unwrap();
    let file = description(dir.path(), "bad.yaml", UNBEAMED);

    let mut cmd = Command::cargo_bin("zgoubidoo").unwrap();
    cmd.arg("write")
        .arg(&file)
        .arg("-o")
        .arg(dir.path())
        .arg("--filename")
        .arg("raw.dat")
        .arg("--no-validate");
    cmd.assert().success();
    let written = fs::read_to_string(dir.path().join("raw.dat")).unwrap();
    assert!(written.starts_with("no_objet\n 'DRIFT'\n100\n"));
}

#[test]
fn keywords_and_filter_list_commands() {
    let dir = tempfile::tempdir().unwrap();
    let file = description(dir.path(), "line.yaml", BEAMLINE);

    let mut cmd = Command::cargo_bin("zgoubidoo").unwrap();
    cmd.arg("keywords").arg(&file);
    cmd.assert()
        .success()
        .stdout(contains("DRIFT").and(contains("QUADRUPO")).and(contains("Q1")));

    let mut cmd = Command::cargo_bin("zgoubidoo").unwrap();
    cmd.arg("filter").arg(&file).arg("Magnet");
    cmd.assert().success().stdout(
        contains("cli_line_filtered_by_Magnet")
            .and(contains("'QUADRUPO' Q1"))
            .and(contains("'DRIFT'").not()),
    );
}

#[test]
fn unsupported_description_format_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = description(dir.path(), "line.toml", "name = 'x'");

    let mut cmd = Command::cargo_bin("zgoubidoo").unwrap();
    cmd.arg("render").arg(&file);
    cmd.assert().failure().stderr(contains("zgoubidoo::config"));
}
