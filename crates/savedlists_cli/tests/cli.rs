use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn savedlists(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("savedlists").unwrap();
    cmd.env_remove("SAVEDLISTS_DB")
        .env_remove("SAVEDLISTS_LOG_LEVEL")
        .arg("--db")
        .arg(db);
    cmd
}

#[test]
fn fresh_database_lists_only_the_standard_list() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");

    savedlists(&db)
        .arg("lists")
        .assert()
        .success()
        .stdout("1\tStored [0]\n");
}

#[test]
fn created_lists_appear_in_collated_order() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");

    savedlists(&db).args(["create", "  zoo  "]).assert().success();
    savedlists(&db).args(["create", "Attic"]).assert().success();

    savedlists(&db)
        .arg("lists")
        .assert()
        .success()
        .stdout("1\tStored [0]\n12\tAttic [0]\n11\tzoo [0]\n");
}

#[test]
fn lists_json_output_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");
    savedlists(&db).args(["create", "Trips"]).assert().success();

    let output = savedlists(&db).args(["lists", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[1]["title"], "Trips");
}

#[test]
fn blank_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");

    savedlists(&db)
        .args(["create", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("list title must not be blank"));
}

#[test]
fn pick_prints_all_lists_id() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");

    savedlists(&db)
        .arg("pick")
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout("2\n")
        .stderr(predicate::str::contains("1) Stored [0]"))
        .stderr(predicate::str::contains("2) <All lists>"))
        .stderr(predicate::str::contains("3) <Create new list>"));
}

#[test]
fn pick_can_create_a_list_on_the_fly() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");

    savedlists(&db)
        .args(["pick", "--only-concrete", "--new-name", "Weekend"])
        .write_stdin("2\n\n")
        .assert()
        .success()
        .stdout("11\n")
        .stderr(predicate::str::contains("List created"));

    savedlists(&db)
        .arg("lists")
        .assert()
        .success()
        .stdout(predicate::str::contains("11\tWeekend [0]"));
}

#[test]
fn dismissed_pick_prints_nothing_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");

    savedlists(&db)
        .arg("pick")
        .write_stdin("\n")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("No list selected."));
}

#[test]
fn rename_uses_typed_name() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");
    savedlists(&db).args(["create", "Draft"]).assert().success();

    savedlists(&db)
        .args(["rename", "11"])
        .write_stdin(" Final \n")
        .assert()
        .success()
        .stdout("11\tFinal [0]\n")
        .stderr(predicate::str::contains("[Draft]"));
}

#[test]
fn items_saved_to_pseudo_lists_land_in_standard_list() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");

    savedlists(&db)
        .args(["save", "GC42", "--list", "0"])
        .assert()
        .success()
        .stdout("1\n");
    savedlists(&db)
        .args(["items", "1"])
        .assert()
        .success()
        .stdout("GC42\n");
}

#[test]
fn deleting_the_standard_list_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("lists.db");

    savedlists(&db)
        .args(["delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("list cannot be deleted: 1"));
}
