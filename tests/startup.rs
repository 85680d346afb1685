//! Startup failures of the broker binary.

use std::path::Path;
use std::process::{Command, Output};

fn run_broker(config: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_route-service-broker"))
        .arg("--config")
        .arg(config)
        .env_remove("VCAP_SERVICES")
        .env_remove("RUST_LOG")
        .env_remove("PORT")
        .env_remove("BROKER_USERNAME")
        .env_remove("BROKER_PASSWORD")
        .output()
        .unwrap()
}

fn occurrences(output: &Output, needle: &str) -> usize {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    stdout.matches(needle).count() + stderr.matches(needle).count()
}

#[test]
fn test_config_error_reported_once() {
    let missing = std::env::temp_dir().join(format!("rsb-missing-{}.toml", std::process::id()));

    let output = run_broker(&missing);

    assert!(!output.status.success());
    assert_eq!(occurrences(&output, "failed to read"), 1);
}

#[test]
fn test_catalog_error_reported_once() {
    let path = std::env::temp_dir().join(format!("rsb-empty-catalog-{}.toml", std::process::id()));
    std::fs::write(&path, "broker_username = \"user\"\nbroker_password = \"secret\"\n").unwrap();

    let output = run_broker(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(!output.status.success());
    assert_eq!(occurrences(&output, "no route service configured"), 1);
}
