//! Configuration specs

use crate::prelude::*;

#[test]
fn missing_config_file_fails() {
    let ws = Workspace::new();
    std::fs::remove_file(ws.config_path()).unwrap();

    ws.sg()
        .args(["product", "reset"])
        .fails()
        .stderr_has("failed to read");
}

#[test]
fn invalid_drift_factor_fails() {
    Workspace::with_config("[lock]\ndrift_factor = 1.5\n")
        .sg()
        .args(["product", "reset"])
        .fails()
        .stderr_has("drift_factor");
}

#[test]
fn unknown_duration_format_fails() {
    Workspace::with_config("[lock]\nttl = \"five seconds\"\n")
        .sg()
        .args(["product", "reset"])
        .fails()
        .stderr_has("invalid config");
}

#[test]
fn empty_redis_url_list_fails() {
    Workspace::new()
        .sg()
        .env("REDIS_URLS", " , ")
        .args(["product", "reset"])
        .fails()
        .stderr_has("lock.stores");
}
