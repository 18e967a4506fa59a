use assert_cmd::Command;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("lending-cli").unwrap();
    // Keep the run independent of any checked-in config directory.
    cmd.env("LENDING_CONFIG_DIR", std::env::temp_dir().join("lending-cli-no-config"))
        .env_remove("LENDING_ENV");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = cli().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("config"));
}

#[test]
fn config_prints_resolved_settings() {
    let output = cli().args(["config", "--port", "9191"]).output().unwrap();
    assert!(output.status.success());

    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["environment"], "local");
    assert_eq!(settings["server"]["port"], 9191);
    assert_eq!(settings["telemetry"]["log_format"], "pretty");
}

#[test]
fn unknown_environment_fails() {
    let output = cli().env("LENDING_ENV", "qa").arg("config").output().unwrap();
    assert!(!output.status.success());
}
