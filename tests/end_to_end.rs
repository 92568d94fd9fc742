//! End-to-end tests for the statusmux binary.
//!
//! These tests pipe a protocol stream through the real executable and
//! check stdout and the exit status.

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Run statusmux with the given arguments, feeding `input` on stdin.
fn run_statusmux(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_statusmux"))
        .args(args)
        .env_remove("STATUSMUX_TIMEOUT")
        .env_remove("STATUSMUX_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start statusmux");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for statusmux")
}

#[test]
fn test_merges_commands_before_upstream_blocks() {
    let input = "{\"version\":1}\n[\n[{\"name\":\"upstream1\"}]\n";
    let output = run_statusmux(&["--timeout", "500ms", "echo hi", "sleep 5"], input);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "{\"version\":1}\n[\n\
         [{\"name\":\"customCmd\",\"instance\":\"echo\",\"full_text\":\"hi\"},\
         {\"full_text\":\"Timed out\"},\
         {\"name\":\"upstream1\"}]\n,"
    );
}

#[test]
fn test_structured_command_output_is_used_verbatim() {
    let input = "{\"version\":1}\n[\n[]\n,[]\n";
    let block = r##"{"name":"load","full_text":"0.42","color":"#ff0000"}"##;
    let output = run_statusmux(&[&format!("echo {}", block)], input);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches(block).count(), 2);
}

#[test]
fn test_upstream_nulls_and_floats_pass_through() {
    let upstream = r##"{"full_text":"x","separator_block_width":9.0,"color":null,"border":"#000"}"##;
    let input = format!("{{\"version\":1}}\n[\n[{}]\n,[{}]\n", upstream, upstream);
    let output = run_statusmux(&["echo hi"], &input);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches(upstream).count(), 2);
}

#[test]
fn test_bad_executable_exits_non_zero() {
    let input = "{\"version\":1}\n[\n[]\n,[]\n,[]\n";
    let output = run_statusmux(&["statusmux-no-such-binary --flag"], input);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"version\":1}\n[\n");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("statusmux-no-such-binary"));
}

#[test]
fn test_malformed_header_exits_non_zero() {
    let output = run_statusmux(&["echo hi"], "hello\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_config_file_supplies_commands() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "[commands]\ntimeout = \"2s\"\nrun = [\"echo from-config\"]").unwrap();
    let path = config.path().to_str().unwrap().to_string();

    let input = "{\"version\":1}\n[\n[{\"name\":\"up\"}]\n";
    let output = run_statusmux(&["--config", &path], input);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout)
        .contains("{\"name\":\"customCmd\",\"instance\":\"echo\",\"full_text\":\"from-config\"},{\"name\":\"up\"}"));
}

#[test]
fn test_init_config_prints_toml() {
    let output = run_statusmux(&["--init-config"], "");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[commands]"));
    assert!(stdout.contains("timeout = \"5s\""));
}
