use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    cargo_bin_cmd!("frostkeep")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("items"))
        .stdout(predicate::str::contains("categories"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_items_help_shows_subcommands() {
    cargo_bin_cmd!("frostkeep")
        .args(["items", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("expiring"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn test_unknown_subcommand_fails() {
    cargo_bin_cmd!("frostkeep")
        .arg("defrost")
        .assert()
        .failure();
}
