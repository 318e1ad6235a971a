//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which writes a commented
//! `Checks.toml` suite file. The interactive wizard asks for the fixture's
//! provision, outputs and teardown commands; `--non-interactive` writes the
//! built-in example, which runs as-is on any POSIX system.
//!
//! 此模块实现了 `init` 命令，用于写出带注释的 `Checks.toml` 套件文件。
//! 交互式向导会询问夹具的创建、输出和销毁命令；`--non-interactive` 则写出内置示例，
//! 该示例可在任何 POSIX 系统上直接运行。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::path::Path;

use crate::infra::fs::{ensure_parent_dir, write_atomically};
use crate::infra::t;

const DEFAULT_PROVISION: &str = "echo provisioning fixture";
const DEFAULT_OUTPUTS: &str = r#"echo '{"greeting": {"value": "hello, world"}}'"#;
const DEFAULT_TEARDOWN: &str = "echo tearing down fixture";

/// Fixture commands written into the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCommands {
    pub provision: String,
    pub outputs: String,
    pub teardown: String,
}

impl Default for FixtureCommands {
    fn default() -> Self {
        Self {
            provision: DEFAULT_PROVISION.to_string(),
            outputs: DEFAULT_OUTPUTS.to_string(),
            teardown: DEFAULT_TEARDOWN.to_string(),
        }
    }
}

/// Executes the init command.
///
/// An existing file is only replaced with `--force` or, in interactive mode,
/// after the user confirms.
///
/// 执行 init 命令。已有文件只有在指定 `--force` 或（交互模式下）用户确认后才会被替换。
pub fn execute(output: &Path, non_interactive: bool, force: bool, language: &str) -> Result<()> {
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!("\n{}", t!("init.wizard_welcome", locale = language).cyan().bold());
        println!("{}", t!("init.wizard_description", locale = language));
    }

    if output.exists() && !force {
        if non_interactive {
            println!("{}", t!("init.file_exists", locale = language, path = output.display()).red());
            println!("{}", t!("init.use_force", locale = language).yellow());
            return Ok(());
        }
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!("init.overwrite_prompt", locale = language, path = output.display()))
            .default(false)
            .interact()
            .with_context(|| t!("init.user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted", locale = language));
            return Ok(());
        }
    }

    let commands = if non_interactive {
        FixtureCommands::default()
    } else {
        prompt_fixture_commands(&theme, language)?
    };

    ensure_parent_dir(output)?;
    write_atomically(output, render_template(language, &commands).as_bytes())
        .with_context(|| t!("init.write_failed", locale = language, path = output.display()).to_string())?;

    println!("{}", t!("init.success", locale = language, path = output.display()).green());
    println!("{}", t!("init.next_steps", locale = language, path = output.display()));
    Ok(())
}

fn prompt_fixture_commands(theme: &ColorfulTheme, language: &str) -> Result<FixtureCommands> {
    let defaults = FixtureCommands::default();
    let ask = |prompt: String, default: String| -> Result<String> {
        Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .default(default)
            .interact_text()
            .with_context(|| t!("init.user_confirmation_failed", locale = language).to_string())
    };

    Ok(FixtureCommands {
        provision: ask(t!("init.provision_prompt", locale = language).to_string(), defaults.provision)?,
        outputs: ask(t!("init.outputs_prompt", locale = language).to_string(), defaults.outputs)?,
        teardown: ask(t!("init.teardown_prompt", locale = language).to_string(), defaults.teardown)?,
    })
}

/// Renders the commented suite template.
/// 渲染带注释的套件模板。
pub fn render_template(language: &str, commands: &FixtureCommands) -> String {
    format!(
        r#"# Check suite / 检查套件
# Run it with: check-runner run -c Checks.toml

# Language for console and HTML output / 控制台和 HTML 输出的语言
language = {language}
# Checks allowed to run at once / 允许同时运行的检查数量
jobs = 1
# Default per-check timeout in seconds / 每个检查的默认超时时间（秒）
timeout_secs = 300

[report]
json = "check-report.json"
html = "check-report.html"

# The shared fixture. Commands run in `working_dir`, relative to this file.
# 共享夹具。命令在 `working_dir` 中运行，该路径相对于本文件。
[fixture]
working_dir = "."
provision = {provision}
# Must print a JSON object; `terraform output -json` works as-is.
# 必须输出一个 JSON 对象；`terraform output -json` 可直接使用。
outputs = {outputs}
teardown = {teardown}

# Inspect a fixture output / 检查夹具输出
[[checks]]
name = "GreetingPresent"
output = "greeting"
not_empty = true
starts_with = "hello"

# Run a command; outputs are exported as FIXTURE_<NAME>.
# Exit 0 passes, exit 77 skips, anything else fails.
# 运行命令；输出以 FIXTURE_<NAME> 的形式导出。退出码 0 表示通过，77 表示跳过，其他表示失败。
[[checks]]
name = "GreetingExported"
command = "sh -c 'test -n \"$FIXTURE_GREETING\"'"
timeout_secs = 30
"#,
        language = toml_string(language),
        provision = toml_string(&commands.provision),
        outputs = toml_string(&commands.outputs),
        teardown = toml_string(&commands.teardown),
    )
}

fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
