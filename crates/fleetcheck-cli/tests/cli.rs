//! End-to-end tests for the fleetcheck binary.
//!
//! Each test writes a fleet document into a temp directory and runs the
//! binary there with a clean environment.

use std::path::Path;
use std::process::{Command, Output};

const AT: &str = "2026-10-19T15:00:00Z";

const FLEET: &str = r#"{
    "authorized_keys": ["AKIATEST"],
    "groups": [
        {
            "name": "web",
            "desired_capacity": 2,
            "availability_zones": ["ap-south-1a", "ap-south-1b"],
            "members": [
                { "instance_id": "i-1", "lifecycle_state": "InService", "availability_zone": "ap-south-1a" },
                { "instance_id": "i-2", "lifecycle_state": "InService", "availability_zone": "ap-south-1b" },
                { "instance_id": "i-3", "lifecycle_state": "Terminated", "availability_zone": "ap-south-1a" }
            ]
        },
        {
            "name": "skewed",
            "desired_capacity": 2,
            "availability_zones": ["ap-south-1a", "ap-south-1b"],
            "members": [
                { "instance_id": "i-1", "lifecycle_state": "InService", "availability_zone": "ap-south-1a" },
                { "instance_id": "i-4", "lifecycle_state": "InService", "availability_zone": "ap-south-1a" }
            ]
        },
        {
            "name": "parked",
            "desired_capacity": 0,
            "availability_zones": ["ap-south-1a"],
            "members": []
        }
    ],
    "instances": [
        { "instance_id": "i-1", "launch_time": "2026-10-19T12:00:00Z", "vpc_id": "vpc-1", "security_groups": ["sg-1"], "image_id": "ami-1" },
        { "instance_id": "i-2", "launch_time": "2026-10-18T15:00:00Z", "vpc_id": "vpc-1", "security_groups": ["sg-1"], "image_id": "ami-1" },
        { "instance_id": "i-3", "launch_time": "2026-10-19T09:00:00Z", "vpc_id": "vpc-1", "security_groups": ["sg-1"], "image_id": "ami-1" },
        { "instance_id": "i-4", "launch_time": "2026-10-19T10:00:00Z", "vpc_id": "vpc-1", "security_groups": ["sg-1"], "image_id": "ami-1" }
    ],
    "scheduled_actions": [
        { "group_name": "web", "start_time": "2026-10-19T17:00:00Z", "name": "evening" },
        { "group_name": "web", "start_time": "2026-10-19T15:10:00Z", "name": "soon" }
    ]
}"#;

fn fleetcheck(dir: &Path, args: &[&str], key: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fleetcheck"));
    cmd.current_dir(dir).env_clear();
    if let Some(key) = key {
        cmd.env("AWS_ACCESS_KEY_ID", key)
            .env("AWS_SECRET_ACCESS_KEY", "secret");
    }
    cmd.args(args).output().unwrap()
}

fn fleet_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fleet.json"), FLEET).unwrap();
    dir
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn healthy_group_passes() {
    let dir = fleet_dir();
    let out = fleetcheck(
        dir.path(),
        &["--fixture", "fleet.json", "--at", AT, "web"],
        Some("AKIATEST"),
    );

    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    assert!(text.contains("longest running instance uptime: 24:00:00 (i-2)"));
    assert!(text.contains("next scheduled action soon runs in: 00:10:00"));
    assert!(text.contains("instances launched and terminated on 2026-10-19: 1"));
    assert!(text.ends_with("result: PASS\n"));
}

#[test]
fn missing_group_argument_is_usage_error() {
    let dir = fleet_dir();
    let out = fleetcheck(dir.path(), &["--fixture", "fleet.json"], Some("AKIATEST"));
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn unknown_group_is_not_found() {
    let dir = fleet_dir();
    let out = fleetcheck(
        dir.path(),
        &["--fixture", "fleet.json", "missing"],
        Some("AKIATEST"),
    );
    assert_eq!(out.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing"));
}

#[test]
fn bad_zone_spread_fails_validation() {
    let dir = fleet_dir();
    let out = fleetcheck(
        dir.path(),
        &["--fixture", "fleet.json", "--at", AT, "skewed"],
        Some("AKIATEST"),
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("FAIL zone-distribution"));
}

#[test]
fn zero_capacity_group_passes() {
    let dir = fleet_dir();
    let out = fleetcheck(
        dir.path(),
        &["--fixture", "fleet.json", "--at", AT, "parked"],
        Some("AKIATEST"),
    );
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("fleet-consistency: PASS (zero capacity)"));
}

#[test]
fn credentials_are_checked_first() {
    let dir = fleet_dir();
    let out = fleetcheck(dir.path(), &["--fixture", "fleet.json", "missing"], None);
    assert_eq!(out.status.code(), Some(3));

    let out = fleetcheck(
        dir.path(),
        &["--fixture", "fleet.json", "missing"],
        Some("AKIAOTHER"),
    );
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn config_file_supplies_fixture_and_format() {
    let dir = fleet_dir();
    std::fs::write(
        dir.path().join("fleetcheck.toml"),
        "[provider]\nfixture = \"fleet.json\"\n\n[run]\nformat = \"json\"\nstop_on_failure = true\n",
    )
    .unwrap();

    let out = fleetcheck(dir.path(), &["--at", AT, "skewed"], Some("AKIATEST"));
    assert_eq!(out.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["verdict"], "fail");
    assert_eq!(value["scenarios"].as_array().unwrap().len(), 1);
}

#[test]
fn missing_fixture_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = fleetcheck(dir.path(), &["web"], Some("AKIATEST"));
    assert_eq!(out.status.code(), Some(2));
}
