//! End-to-end execution tests: argument matching, environment bridging,
//! and exit-code propagation through the compiled binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;
use std::process::Command;

#[test]
fn test_flag_and_positional_reach_script_environment() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(temp_dir.path(), "demo.sh", DEMO_SCRIPT);

    let output = Command::new(&binary)
        .arg(&script)
        .args(["-f", "somefile.txt"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "force=true verbose= file=somefile.txt"
    );
}

#[test]
fn test_no_flags_bridges_empty_values() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(temp_dir.path(), "demo.sh", DEMO_SCRIPT);

    let output = Command::new(&binary)
        .arg(&script)
        .arg("somefile.txt")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "force= verbose= file=somefile.txt");
}

#[test]
fn test_missing_required_positional_exits_2_without_running_script() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(temp_dir.path(), "demo.sh", DEMO_SCRIPT);

    let output = Command::new(&binary)
        .arg(&script)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing required argument <file>"),
        "stderr was: {stderr}"
    );
    // The script never ran, so nothing was echoed.
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_flag_exits_2_without_running_script() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(temp_dir.path(), "demo.sh", DEMO_SCRIPT);

    let output = Command::new(&binary)
        .arg(&script)
        .args(["--unknown", "somefile.txt"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unknown flag --unknown"),
        "stderr was: {stderr}"
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_child_exit_code_is_propagated() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(
        temp_dir.path(),
        "fail.sh",
        "#!/bin/sh\n#USAGE bin \"fail\"\nexit 7\n",
    );

    let output = Command::new(&binary)
        .arg(&script)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_overlay_wins_over_inherited_environment() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(temp_dir.path(), "demo.sh", DEMO_SCRIPT);

    let output = Command::new(&binary)
        .env("usage_force", "inherited")
        .arg(&script)
        .args(["-f", "x.txt"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("force=true"), "stdout was: {stdout}");
}

#[test]
fn test_unrelated_inherited_environment_is_kept() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(
        temp_dir.path(),
        "env.sh",
        "#!/bin/sh\n#USAGE bin \"env\"\necho \"keep=${KEEP_ME}\"\n",
    );

    let output = Command::new(&binary)
        .env("KEEP_ME", "yes")
        .arg(&script)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "keep=yes");
}

#[test]
fn test_value_flag_and_normalized_key() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(
        temp_dir.path(),
        "log.sh",
        r#"#!/bin/sh
#USAGE bin "log"
#USAGE flag "--log-level <level>" default="info"
echo "level=${usage_log_level}"
"#,
    );

    let defaulted = Command::new(&binary)
        .arg(&script)
        .output()
        .expect("Failed to execute command");
    assert_eq!(
        String::from_utf8_lossy(&defaulted.stdout).trim(),
        "level=info"
    );

    let inline = Command::new(&binary)
        .arg(&script)
        .arg("--log-level=debug")
        .output()
        .expect("Failed to execute command");
    assert_eq!(
        String::from_utf8_lossy(&inline.stdout).trim(),
        "level=debug"
    );
}

#[test]
fn test_raw_arguments_are_passed_through_to_child() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(
        temp_dir.path(),
        "argv.sh",
        "#!/bin/sh\n#USAGE bin \"argv\"\n#USAGE flag \"-f --force\"\n#USAGE arg \"[file]\"\necho \"argv=$*\"\n",
    );

    let output = Command::new(&binary)
        .arg(&script)
        .args(["-f", "x.txt"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "argv=-f x.txt");
}

#[test]
fn test_script_without_shebang_runs_under_sh() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(
        temp_dir.path(),
        "plain",
        "#USAGE bin \"plain\"\necho from-sh\n",
    );

    let output = Command::new(&binary)
        .arg(&script)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "from-sh");
}

#[test]
fn test_missing_interpreter_exits_2_with_spawn_error() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(
        temp_dir.path(),
        "ghost.sh",
        "#!/usr/bin/env no-such-interp-7fk2\n#USAGE bin \"ghost\"\n",
    );

    let output = Command::new(&binary)
        .arg(&script)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot start"), "stderr was: {stderr}");
}

#[test]
fn test_double_dash_sends_dash_tokens_to_positionals() {
    let binary = get_binary_path();
    let temp_dir = create_temp_dir();
    let script = create_script(temp_dir.path(), "demo.sh", DEMO_SCRIPT);

    let output = Command::new(&binary)
        .arg(&script)
        .args(["--", "-f"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "force= verbose= file=-f");
}
