#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::io::Write;
use tempfile::NamedTempFile;

const EXPORT: &str = r##"<table>
  <tr><td></td><td><font>2016/KW 9</font></td></tr>
  <tr><td><font>Gruppe</font></td><td><font>29.02-05.03</font></td></tr>
  <tr>
    <td bgcolor="#FFCC00"><font>FS151+BSc (FST) d</font></td>
    <td><font>Mi 10:15 [A101] Mathematik</font><br><font>Do 08:00 Labor (x)</font></td>
  </tr>
</table>"##;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

fn export_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(EXPORT.as_bytes()).expect("write export");
    file
}

fn escaped(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().replace('\\', "\\\\")
}

#[test]
fn cli_extract_requires_loaded_export() {
    run_cli("extract\nquit\n")
        .success()
        .stdout(str_contains("No export loaded."));
}

#[test]
fn cli_extracts_and_shows_events() {
    let export = export_file();
    let script = format!("load {}\nextract\nshow\nclasses\nquit\n", escaped(&export));

    run_cli(&script)
        .success()
        .stdout(str_contains("Extracted 1 events for 1 classes (1 diagnostics)."))
        .stdout(str_contains("Mathematik"))
        .stdout(str_contains("2016-03-02 10:15:00"))
        .stdout(str_contains("2015-FS151-BSc-FST-d (1 events)"));
}

#[test]
fn cli_lists_diagnostics() {
    let export = export_file();
    let script = format!("load {}\nextract\ndiagnostics\nquit\n", escaped(&export));

    run_cli(&script)
        .success()
        .stdout(str_contains("unresolved_group \"x\" at row 2, wrap 0, column 1"));
}

#[test]
fn cli_rejects_invalid_config() {
    let mut config = NamedTempFile::new().expect("create temp file");
    write!(config, r#"{{ "default_duration_hours": -1 }}"#).expect("write config");
    let script = format!("config {}\nquit\n", escaped(&config));

    run_cli(&script)
        .success()
        .stdout(str_contains("invalid config: default_duration_hours must be positive"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let export = export_file();
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = escaped(&tmp);
    let script = format!(
        "load {}\nextract\nsave json {}\nload json {}\nshow\nquit\n",
        escaped(&export),
        path,
        path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Saved 1 events to"), "expected save confirmation:\n{}", output);
    let after_reload = output.split("Loaded 1 events, 1 classes.").last().unwrap_or_default();
    assert!(
        after_reload.contains("Mathematik"),
        "reloaded plan should still hold the event:\n{}",
        after_reload
    );
}

#[test]
fn cli_unknown_command() {
    run_cli("frobnicate\nquit\n")
        .success()
        .stdout(str_contains("Unknown command. Type 'help'."));
}
