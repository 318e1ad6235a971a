//! # Command Execution Module / 命令执行模块
//!
//! Turns configured command lines into `tokio` processes and captures
//! their output.
//!
//! 将配置的命令行转换为 `tokio` 进程并捕获其输出。

use anyhow::{Context, Result, anyhow};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::infra::shell_fixture::OUTPUT_ENV_PREFIX;

/// Output of a finished process.
/// 已结束进程的输出。
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// Stdout followed by stderr, for display.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&self.stderr);
        }
        combined
    }
}

/// Expands `~` and `$VARS` in `command_line`, splits it the way a POSIX
/// shell would, and builds a [`Command`] from the parts with `env` applied.
///
/// Variables are looked up in `env` first, then in the process environment;
/// unknown variables are left as written so a child shell can still see
/// them. `FIXTURE_*` names are never taken from the process environment:
/// fixture outputs reach checks only through the child's environment, so a
/// check reads them with `sh -c '... "$FIXTURE_NAME" ...'` and their text is
/// never spliced into the command line. The child is killed if the
/// command's future is dropped.
///
/// 展开 `command_line` 中的 `~` 和 `$VARS`，按 POSIX shell 的规则拆分，
/// 并用拆分结果构建应用了 `env` 的 [`Command`]。
/// 变量先在 `env` 中查找，再在进程环境中查找；未知变量保持原样。
/// `FIXTURE_*` 变量不会从进程环境展开，夹具输出只通过子进程的环境变量传递。
pub fn build_command(command_line: &str, env: &BTreeMap<String, String>) -> Result<Command> {
    let expanded_command = shellexpand::full_with_context(
        command_line,
        || std::env::var("HOME").ok(),
        |var: &str| -> Result<Option<String>, Infallible> {
            Ok(match env.get(var) {
                Some(value) => Some(value.clone()),
                None if var.starts_with(OUTPUT_ENV_PREFIX) => None,
                None => std::env::var(var).ok(),
            })
        },
    )
    .with_context(|| format!("Failed to expand command: {command_line}"))?
    .to_string();

    let parts = shlex::split(&expanded_command)
        .ok_or_else(|| anyhow!("Failed to parse command: {}", expanded_command))?;

    let Some((program, args)) = parts.split_first() else {
        return Err(anyhow!("Empty command after parsing: {command_line:?}"));
    };

    let mut cmd = Command::new(program);
    cmd.args(args).envs(env).kill_on_drop(true);
    Ok(cmd)
}

/// Runs `cmd` to completion with stdout and stderr captured.
/// 运行 `cmd` 直至结束，并捕获标准输出和标准错误。
pub async fn run_captured(mut cmd: Command) -> Result<CapturedOutput> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .with_context(|| format!("Failed to run '{program}'"))?;

    Ok(CapturedOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
