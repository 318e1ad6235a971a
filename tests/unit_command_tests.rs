//! # Command Module Unit Tests / Command 模块单元测试
//!
//! Command-line expansion, splitting and capture. Requires a POSIX `sh`.
//!
//! 命令行展开、拆分与输出捕获。需要 POSIX `sh`。

use check_runner::infra::command::{build_command, run_captured};
use std::collections::BTreeMap;

fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_build_command_splits_quoted_arguments() {
    let cmd = build_command(r#"echo "hello world" 'single quoted'"#, &BTreeMap::new()).unwrap();
    let std_cmd = cmd.as_std();
    assert_eq!(std_cmd.get_program(), "echo");
    let args: Vec<_> = std_cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(args, ["hello world", "single quoted"]);
}

#[test]
fn test_build_command_expands_from_the_given_env() {
    let cmd = build_command("echo $REGION", &env(&[("REGION", "ap-southeast-1")])).unwrap();
    let args: Vec<_> = cmd.as_std().get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(args, ["ap-southeast-1"]);
}

#[test]
fn test_unknown_variables_are_left_as_written() {
    let cmd = build_command("echo $CHECK_RUNNER_SURELY_UNSET_VAR", &BTreeMap::new()).unwrap();
    let args: Vec<_> = cmd.as_std().get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(args, ["$CHECK_RUNNER_SURELY_UNSET_VAR"]);
}

#[test]
fn test_fixture_output_variables_are_left_for_the_child() {
    let cmd = build_command(r#"sh -c 'echo "$FIXTURE_OWNER"'"#, &BTreeMap::new()).unwrap();
    let args: Vec<_> = cmd.as_std().get_args().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(args, ["-c", r#"echo "$FIXTURE_OWNER""#]);
}

#[test]
fn test_empty_and_unbalanced_commands_are_errors() {
    assert!(build_command("", &BTreeMap::new()).is_err());
    assert!(build_command("   ", &BTreeMap::new()).is_err());
    assert!(build_command("echo 'unterminated", &BTreeMap::new()).is_err());
}

#[tokio::test]
async fn test_run_captured_collects_both_streams() {
    let cmd = build_command("sh -c 'echo out; echo err >&2; exit 4'", &BTreeMap::new()).unwrap();
    let output = run_captured(cmd).await.unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert_eq!(output.stdout.trim(), "out");
    assert_eq!(output.stderr.trim(), "err");
    assert_eq!(output.combined(), "out\nerr\n");
}

#[tokio::test]
async fn test_env_is_passed_to_the_child() {
    let cmd = build_command(
        r#"sh -c 'printf %s "$GREETING"'"#,
        &env(&[("GREETING", "hi")]),
    )
    .unwrap();
    let output = run_captured(cmd).await.unwrap();
    assert_eq!(output.stdout, "hi");
}
