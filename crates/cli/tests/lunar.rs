use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn lunar() -> Command {
    Command::cargo_bin("lunar").expect("lunar bin")
}

fn lines(rates: &[&str], tail: &[&str]) -> String {
    let mut input: Vec<&str> = rates.to_vec();
    input.extend_from_slice(tail);
    input.join("\n") + "\n"
}

fn soft_landing_rates() -> Vec<&'static str> {
    let mut rates = vec!["0"; 7];
    rates.push("164.31426784");
    rates.extend(std::iter::repeat_n("200", 7));
    rates
}

#[test]
fn free_fall_blasts_a_crater() {
    lunar()
        .write_stdin(lines(&["0"; 12], &["NO"]))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "CONTROL CALLING LUNAR MODULE. MANUAL CONTROL IS NECESSARY",
        ))
        .stdout(predicate::str::contains(
            "BETWEEN 8 & 200 LBS/SEC. YOU'VE 16000 LBS FUEL. ESTIMATED",
        ))
        .stdout(predicate::str::contains(
            "      0             120      0        3600.00     16000.0      K=:",
        ))
        .stdout(predicate::str::contains("ON THE MOON AT   113.55 SECS"))
        .stdout(predicate::str::contains("IMPACT VELOCITY OF  4008.79 M.P.H."))
        .stdout(predicate::str::contains(
            "SORRY,BUT THERE WERE NO SURVIVORS-YOU BLEW IT!",
        ))
        .stdout(predicate::str::contains(
            "IN FACT YOU BLASTED A NEW LUNAR CRATER  1113.55 FT. DEEP",
        ))
        .stdout(predicate::str::contains("CONTROL OUT"));
}

#[test]
fn tuned_burn_lands_gently() {
    lunar()
        .write_stdin(lines(&soft_landing_rates(), &["n"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("ON THE MOON AT   148.38 SECS"))
        .stdout(predicate::str::contains("IMPACT VELOCITY OF     3.56 M.P.H."))
        .stdout(predicate::str::contains("FUEL LEFT:   680.94 LBS"))
        .stdout(predicate::str::contains("GOOD LANDING-(COULD BE BETTER)"));
}

#[test]
fn full_burn_reports_fuel_out() {
    lunar()
        .write_stdin(lines(&["200"; 8], &["no"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("FUEL OUT AT    80.00 SECS"));
}

#[test]
fn illegal_rates_are_refused_and_reprompted() {
    let refusal = format!("NOT POSSIBLE{}K=:", ".".repeat(51));
    let mut rates = vec!["5", "abc", "-1", "201"];
    rates.extend(["0"; 12]);
    lunar()
        .write_stdin(lines(&rates, &["NO"]))
        .assert()
        .success()
        .stdout(predicate::str::contains(refusal.clone()))
        .stdout(predicate::function(move |out: &str| {
            out.matches(&refusal).count() == 4
        }));
}

#[test]
fn yes_replays_the_descent() {
    let mut input = lines(&["0"; 12], &["Yes"]);
    input.push_str(&lines(&["0"; 12], &["NO"]));
    lunar()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::function(|out: &str| {
            out.matches("FIRST RADAR CHECK COMING UP").count() == 2
        }));
}

#[test]
fn echo_mode_repeats_input() {
    lunar()
        .arg("--echo")
        .write_stdin(lines(&["0"; 12], &["NO"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("K=:0\n"))
        .stdout(predicate::str::contains("(ANS. YES OR NO):NO\n"));
}

#[test]
fn end_of_input_is_fatal() {
    lunar()
        .write_stdin("0\n0\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("END OF INPUT"));
}

#[test]
fn flight_log_is_written_per_round() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = dir.path().join("flight.csv");

    let mut input = lines(&["0"; 12], &["y"]);
    input.push_str(&lines(&["200"; 8], &["n"]));
    lunar()
        .arg("--flight-log")
        .arg(&log)
        .write_stdin(input)
        .assert()
        .success();

    let first = fs::read_to_string(&log).expect("first log");
    assert_eq!(first.lines().count(), 13);
    assert!(dir.path().join("flight.json").exists());
    let second = fs::read_to_string(dir.path().join("flight-2.csv")).expect("second log");
    assert_eq!(second.lines().count(), 9);
    assert!(dir.path().join("flight-2.json").exists());
}

#[test]
fn scenario_file_changes_the_mission() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("short.toml");
    fs::write(&config, "[initial]\naltitude_miles = 2.0\nvelocity_miles_s = 0.0\n").unwrap();

    lunar()
        .arg("--config")
        .arg(&config)
        .write_stdin(lines(&["0"; 7], &["NO"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("ON THE MOON AT    63.25 SECS"));
}

#[test]
fn invalid_scenario_fails_fast() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[environment]\ngravity = -1.0\n").unwrap();

    lunar()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("environment.gravity"));
}
