use std::{fs, process::Command};

#[test]
fn headless_run_writes_a_snapshot() {
    let snapshot = std::env::temp_dir().join(format!(
        "pop-defence-snapshot-{}.json",
        std::process::id()
    ));

    let status = Command::new(env!("CARGO_BIN_EXE_pop-defence"))
        .args([
            "--difficulty",
            "easy",
            "--max-seconds",
            "10",
            "--frame-ms",
            "50",
            "--build",
            "dart_monkey@550,300",
            "--auto-start",
            "--snapshot",
        ])
        .arg(&snapshot)
        .env("RUST_LOG", "warn")
        .status()
        .expect("failed to run pop-defence binary");
    assert!(status.success(), "headless run should succeed");

    let text = fs::read_to_string(&snapshot).expect("snapshot was written");
    let _ = fs::remove_file(&snapshot);
    let json: serde_json::Value = serde_json::from_str(&text).expect("snapshot is JSON");

    assert_eq!(json["outcome"], "InProgress");
    assert_eq!(json["settings"]["difficulty"], "easy");
    assert_eq!(json["state"]["towers"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["state"]["wave_number"], 1);
}

#[test]
fn malformed_build_order_is_rejected() {
    let status = Command::new(env!("CARGO_BIN_EXE_pop-defence"))
        .args(["--build", "dart_monkey", "--max-seconds", "0"])
        .status()
        .expect("failed to run pop-defence binary");
    assert!(!status.success());
}
