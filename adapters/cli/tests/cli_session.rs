use std::{
    fs,
    io::Write,
    path::Path,
    process::{Command, Output, Stdio},
};

fn run_cli(args: &[&str], script: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_creepydom"))
        .args(args)
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch the creepydom binary");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(script.as_bytes())
        .expect("failed to write the input script");
    child.wait_with_output().expect("binary exits")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn scripted_session_prints_board_and_summary() {
    let output = run_cli(&["--seed", "7"], "?\nw\nq\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Level 1:"));
    assert!(stdout.contains(" @ "));
    assert!(stdout.contains("Completed 0 of 20 levels."));
}

#[test]
fn progress_file_caps_the_starting_level() {
    let dir = tempfile::tempdir().expect("temp dir");
    let progress = dir.path().join("progress.json");
    fs::write(&progress, r#"{ "unlocked": 3 }"#).expect("writes progress");

    let output = run_cli(
        &["--seed", "1", "--level", "9", "--progress", path_arg(&progress)],
        "q\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Level 3:"));
    assert!(stdout.contains("Completed 2 of 20 levels."));
}

#[test]
fn custom_config_replaces_the_campaign() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("game.toml");
    fs::write(
        &config,
        r#"
        [[levels]]
        grid_size = 3
        start_rank = 0
        target_rank = 1
        special_probability = 0.0
        time_budget_secs = 15
        "#,
    )
    .expect("writes config");

    let output = run_cli(&["--seed", "2", "--config", path_arg(&config)], "q\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Level 1: grow from Mite to Aphid within 0:15."));
    assert!(stdout.contains("Completed 0 of 1 levels."));
}

#[test]
fn invalid_config_fails_with_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("game.toml");
    fs::write(
        &config,
        r#"
        [[levels]]
        grid_size = 1
        start_rank = 0
        target_rank = 1
        special_probability = 0.1
        "#,
    )
    .expect("writes config");

    let output = run_cli(&["--config", path_arg(&config)], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid [[levels]] table"));
}
