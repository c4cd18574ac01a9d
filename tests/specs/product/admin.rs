//! Product administration specs
//!
//! The memory backend starts every invocation with an empty table.

use crate::prelude::*;

#[test]
fn create_prints_new_product() {
    Workspace::new()
        .sg()
        .args(["product", "create", "widget", "5"])
        .passes()
        .stdout_has("#1 widget (stock: 5)");
}

#[test]
fn create_as_json() {
    let out = Workspace::new()
        .sg()
        .args(["--format", "json", "product", "create", "widget", "5"])
        .passes();

    let json = out.json();
    assert_eq!(json["id"], 1);
    assert_eq!(json["name"], "widget");
    assert_eq!(json["stock"], 5);
}

#[test]
fn reset_creates_default_product() {
    Workspace::new()
        .sg()
        .args(["product", "reset"])
        .passes()
        .stdout_has("Test Product (stock: 1000)");
}

#[test]
fn clear_succeeds_on_empty_table() {
    Workspace::new()
        .sg()
        .args(["product", "clear"])
        .passes()
        .stdout_has("All products cleared");
}

#[test]
fn get_missing_product_fails() {
    Workspace::new()
        .sg()
        .args(["product", "get", "3"])
        .fails()
        .stderr_has("product 3 not found");
}
