//! Error reporting specs
//!
//! Failures exit non-zero with a single `error:` line on stderr.

use crate::prelude::*;

#[test]
fn deduct_from_missing_product_fails() {
    Workspace::new()
        .sg()
        .args(["deduct", "1"])
        .fails()
        .stderr_has("error: product 1 not found");
}

#[test]
fn zero_quantity_is_rejected() {
    Workspace::new()
        .sg()
        .args(["deduct", "1", "--quantity", "0"])
        .fails()
        .stderr_has("quantity must be at least 1");
}

#[test]
fn negative_quantity_is_rejected() {
    Workspace::new()
        .sg()
        .args(["deduct", "1", "--quantity", "-2"])
        .fails()
        .stderr_has("quantity must be at least 1, got -2");
}

#[test]
fn unknown_policy_is_rejected() {
    Workspace::new()
        .sg()
        .args(["deduct", "1", "--policy", "optimistic"])
        .fails()
        .stderr_has("unknown policy 'optimistic'");
}

#[test]
fn negative_initial_stock_is_rejected() {
    Workspace::new()
        .sg()
        .args(["product", "create", "widget", "-5"])
        .fails()
        .stderr_has("initial stock must not be negative, got -5");
}

#[test]
fn load_without_lock_stores_fails() {
    Workspace::new()
        .sg()
        .args(["load", "--stores", "0"])
        .fails()
        .stderr_has("at least one lock store is required");
}
