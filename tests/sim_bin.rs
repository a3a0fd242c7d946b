use std::process::Command;

fn run_sim(seed1: u64, seed2: u64) -> serde_json::Value {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .arg(seed1.to_string())
        .arg(seed2.to_string())
        .output()
        .expect("failed to run sim");
    assert!(output.status.success(), "sim exited with {:?}", output.status);
    serde_json::from_slice(&output.stdout).expect("sim output is not JSON")
}

#[test]
fn test_sim_reports_a_winner() {
    let result = run_sim(12345, 67890);
    let winner = result["winner"].as_str().expect("no winner");
    assert!(winner == "host" || winner == "peer");
    assert_eq!(result[winner]["state"], "Win");
    let loser = if winner == "host" { "peer" } else { "host" };
    assert_eq!(result[loser]["state"], "Lose");
    assert!(result[winner]["shots"].as_u64().unwrap() >= 17);
}

#[test]
fn test_sim_is_deterministic() {
    assert_eq!(run_sim(42, 43), run_sim(42, 43));
}

#[test]
fn test_sim_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .output()
        .expect("failed to run sim");
    assert!(!output.status.success());
}
