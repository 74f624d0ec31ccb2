use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn presets_are_listed() {
    Command::cargo_bin("quickdraw")
        .unwrap()
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("classic").and(predicate::str::contains("frantic")));
}

#[test]
fn round_prints_a_transcript() {
    Command::cargo_bin("quickdraw")
        .unwrap()
        .args(["round", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRAW] signal shown"))
        .stdout(predicate::str::contains("winner:             Opponent"));
}

#[test]
fn fast_reaction_wins_the_round() {
    Command::cargo_bin("quickdraw")
        .unwrap()
        .args(["round", "--seed", "7", "--reaction", "0.04", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""winner": "player""#));
}

#[test]
fn unknown_preset_fails() {
    Command::cargo_bin("quickdraw")
        .unwrap()
        .args(["round", "--preset", "sundown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn sweep_prints_a_table() {
    Command::cargo_bin("reaction-sweep")
        .unwrap()
        .args(["--trials", "5", "--from", "0.05", "--to", "0.1", "--step", "0.05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("win rate"));
}
