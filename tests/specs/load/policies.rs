//! Load driver specs
//!
//! Each run creates its own counter and fires all requests at once.

use crate::prelude::*;

fn load_json(policy: &str, stock: &str, requests: &str) -> serde_json::Value {
    Workspace::new()
        .sg()
        .args([
            "--format",
            "json",
            "load",
            "--policy",
            policy,
            "--stock",
            stock,
            "--requests",
            requests,
        ])
        .passes()
        .json()
}

#[test]
fn safe_load_stops_exactly_at_zero() {
    Workspace::new()
        .sg()
        .args(["load", "--policy", "safe", "--stock", "100", "--requests", "102"])
        .passes()
        .stdout_has("policy: safe")
        .stdout_has("succeeded: 100")
        .stdout_has("insufficient: 2")
        .stdout_has("stock: 100 -> 0")
        .stdout_has("lost updates: 0");
}

#[test]
fn safe_load_over_five_stores() {
    Workspace::new()
        .sg()
        .args(["load", "--stores", "5", "--stock", "20", "--requests", "20"])
        .passes()
        .stdout_has("succeeded: 20")
        .stdout_has("stock: 20 -> 0");
}

#[test]
fn no_lock_load_loses_updates() {
    let report = load_json("no-lock", "100", "100");

    assert_eq!(report["policy"], "no-lock");
    assert_eq!(report["succeeded"], 100);
    assert!(report["final_stock"].as_i64().unwrap() > 0, "{}", report);
}

#[test]
fn early_release_load_loses_updates() {
    let report = load_json("unsafe-early-release", "100", "20");

    assert_eq!(report["succeeded"], 20);
    assert!(report["final_stock"].as_i64().unwrap() > 80, "{}", report);
}

#[test]
fn forced_rollback_load_keeps_stock() {
    let report = load_json("forced-rollback", "10", "20");

    assert_eq!(report["rolled_back"], 20);
    assert_eq!(report["succeeded"], 0);
    assert_eq!(report["final_stock"], 10);
}
