//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Workspace::new()
        .sg()
        .args(["--help"])
        .passes()
        .stdout_has("product")
        .stdout_has("deduct")
        .stdout_has("load");
}

#[test]
fn deduct_help_lists_policies() {
    Workspace::new()
        .sg()
        .args(["deduct", "--help"])
        .passes()
        .stdout_has("--quantity")
        .stdout_has("--policy");
}

#[test]
fn version_is_printed() {
    Workspace::new()
        .sg()
        .args(["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}
