use std::{fs, path::Path, process::Command};

fn bibimamba(config: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bibimamba"));
    cmd.arg("--config").arg(config).env_remove("BIBIMAMBA_LOG");
    cmd
}

fn write_config(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn show_prints_derived_names() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "{}");

    let out = bibimamba(&config)
        .args(["show", "--root", "/tmp/envs", "--python", "3.10.3"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["subdirName"], "conda_python_3.10");
    assert_eq!(json["environmentName"], "conda_python_3.10.3");
    assert_eq!(json["majorMinor"], "3.10");
}

#[test]
fn show_substitutes_configured_fallback() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), r#"{"fallbackVersion":"3.11.9"}"#);

    let out = bibimamba(&config)
        .args(["show", "--root", "/tmp/envs"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["version"], "3.11.9");
    assert_eq!(json["subdirName"], "conda_python_3.11");
}

#[test]
fn versions_come_from_config() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), r#"{"pythonVersions":["3.12.3","3.8.10"]}"#);

    let out = bibimamba(&config).arg("versions").output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "3.12.3\n3.8.10\n");
}

#[test]
fn existing_subdir_refuses_to_start() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "{}");
    let root = tmp.path().join("root");
    fs::create_dir_all(root.join("conda_python_3.10")).unwrap();

    let out = bibimamba(&config)
        .args(["create", "--python", "3.10.3", "--root"])
        .arg(&root)
        .arg("--micromamba-dir")
        .arg(tmp.path())
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Exist conda_python_3.10"));
}

#[test]
fn empty_root_refuses_to_start() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), "{}");

    let out = bibimamba(&config)
        .args(["create", "--root", "", "--python", "3.10.3"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Empty Path"));
}

#[test]
fn bad_config_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    let config = write_config(tmp.path(), r#"{"pythonVersions":[]}"#);

    let out = bibimamba(&config).arg("versions").output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no python versions"));
}
