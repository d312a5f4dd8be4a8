mod common;

use assert_cmd::Command;
use predicates::str::contains;
use std::path::Path;

fn cli(base: &Path) -> Command {
    let mut cmd = Command::cargo_bin("finance_core_cli").unwrap();
    cmd.arg("--no-color").arg("--data-dir").arg(base);
    cmd
}

#[test]
fn summary_seeds_a_fresh_directory() {
    let base = common::temp_base();
    cli(&base)
        .arg("summary")
        .assert()
        .success()
        .stdout(contains("Personal summary"))
        .stdout(contains("$2,850.00"));
    assert!(base.join("transactions.json").exists());
}

#[test]
fn added_transaction_shows_up_in_list() {
    let base = common::temp_base();
    cli(&base)
        .args([
            "add",
            "--kind",
            "egreso",
            "--description",
            "Cena con amigos",
            "--amount",
            "45.30",
            "--category",
            "Entretenimiento",
            "--date",
            "2023-07-22",
        ])
        .assert()
        .success()
        .stdout(contains("Added transaction"));

    cli(&base)
        .args(["list", "--search", "cena"])
        .assert()
        .success()
        .stdout(contains("Cena con amigos"))
        .stdout(contains("22/07/2023"));
}

#[test]
fn invalid_amount_is_reported_per_field() {
    let base = common::temp_base();
    cli(&base)
        .args([
            "add",
            "--kind",
            "ingreso",
            "--description",
            "Bono",
            "--amount",
            "0",
            "--category",
            "Salario",
        ])
        .assert()
        .failure()
        .stderr(contains("enter a valid amount greater than 0"));
}

#[test]
fn deleting_unknown_id_fails() {
    let base = common::temp_base();
    cli(&base)
        .args(["delete", "5b0f1c7e-8e1f-4f0e-9a55-0f0b8a8f3a11"])
        .assert()
        .failure()
        .stderr(contains("Transaction not found"));
}

#[test]
fn report_months_outside_the_supported_range_are_rejected() {
    let base = common::temp_base();
    for months in ["0", "1201", "18446744073709551615"] {
        cli(&base)
            .args(["report", "--months", months])
            .assert()
            .failure()
            .stderr(contains("--months"));
    }
    cli(&base)
        .args(["report", "--months", "1200"])
        .assert()
        .success()
        .stdout(contains("Cumulative balance"));
}

#[test]
fn restoring_a_path_outside_the_backups_dir_fails() {
    let base = common::temp_base();
    cli(&base)
        .args(["backup", "--restore", "../transactions.json"])
        .assert()
        .failure()
        .stderr(contains("not a backup file name"));
}

#[test]
fn export_to_stdout_writes_csv() {
    let base = common::temp_base();
    cli(&base)
        .args(["export", "--account", "business", "--stdout", "--sort", "date-asc"])
        .assert()
        .success()
        .stdout(contains("Fecha,Descripción,Categoría,Tipo,Monto"))
        .stdout(contains("2023-07-01,\"Venta de servicios\",\"Ventas\",ingreso,5000"));
}

#[test]
fn categories_follow_the_account_type() {
    let base = common::temp_base();
    cli(&base)
        .args(["categories", "--account", "business"])
        .assert()
        .success()
        .stdout(contains("Marketing"));
}

#[test]
fn version_prints_build_metadata() {
    let base = common::temp_base();
    cli(&base)
        .arg("version")
        .assert()
        .success()
        .stdout(contains("finance_core"));
}
