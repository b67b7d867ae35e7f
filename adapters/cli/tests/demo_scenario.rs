use std::process::Command;

const DEMO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/three_spots.toml");

#[test]
fn demo_scenario_reports_the_tree_outline() {
    let output = Command::new(env!("CARGO_BIN_EXE_scan-tree"))
        .arg(DEMO)
        .output()
        .expect("failed to run scan-tree");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("3 candidates, range 5"));
    assert!(stdout.contains("scan west gate (10, 10, 0)"));
    assert!(stdout.contains("scan bridge (10, 16, 0)"));
}

#[test]
fn json_output_parses_and_honours_meerkats() {
    let output = Command::new(env!("CARGO_BIN_EXE_scan-tree"))
        .args([DEMO, "--format", "json", "--meerkats"])
        .output()
        .expect("failed to run scan-tree");

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is json");
    let nodes = report["nodes"].as_array().expect("node list");
    assert!(!nodes.is_empty());
    assert_eq!(nodes[0]["depth"], 0);
}

#[test]
fn missing_scenario_fails_with_context() {
    let output = Command::new(env!("CARGO_BIN_EXE_scan-tree"))
        .arg("does/not/exist.toml")
        .output()
        .expect("failed to run scan-tree");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read scenario"));
}
