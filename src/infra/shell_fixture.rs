//! # Shell Fixture Module / Shell 夹具模块
//!
//! A [`FixtureProvider`] driven by three configured shell commands:
//! `provision`, `outputs` and `teardown`. The `outputs` command prints a JSON
//! object of named values (for example `terraform output -json`), which
//! becomes the [`FixtureOutputs`] handle that checks read from.
//!
//! 由三个配置的 shell 命令驱动的 [`FixtureProvider`]：`provision`、`outputs` 和 `teardown`。
//! `outputs` 命令输出一个包含命名值的 JSON 对象（例如 `terraform output -json`），
//! 它将成为检查读取的 [`FixtureOutputs`] 句柄。

use anyhow::{Context, Result, bail};
use colored::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::config::FixtureConfig;
use crate::core::fixture::FixtureProvider;
use crate::infra::command::{self, CapturedOutput};
use crate::infra::fs::resolve_relative;
use crate::infra::t;

/// Named values describing a provisioned fixture.
/// 描述已创建夹具的命名值。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixtureOutputs {
    values: BTreeMap<String, Value>,
}

impl FixtureOutputs {
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    /// Parses a JSON object of outputs.
    ///
    /// An entry that is itself an object with a `value` field is replaced by
    /// that field, which is the shape `terraform output -json` prints.
    ///
    /// 解析输出的 JSON 对象。
    /// 如果某个条目本身是带有 `value` 字段的对象，则用该字段替换它，
    /// 这正是 `terraform output -json` 输出的格式。
    pub fn from_json(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let parsed: Value =
            serde_json::from_str(trimmed).with_context(|| t!("fixture.outputs_not_json").to_string())?;
        let Value::Object(entries) = parsed else {
            bail!("{}", t!("fixture.outputs_not_object"));
        };

        let values = entries
            .into_iter()
            .map(|(name, value)| (name, unwrap_described_value(value)))
            .collect();
        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Text form of an output: strings verbatim, anything else as JSON.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).map(value_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Environment variables exported to command checks, one
    /// `FIXTURE_<NAME>` per output.
    /// 导出给命令检查的环境变量，每个输出对应一个 `FIXTURE_<NAME>`。
    pub fn env_vars(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(name, value)| (env_var_name(name), value_text(value)))
            .collect()
    }
}

fn unwrap_described_value(value: Value) -> Value {
    match value {
        Value::Object(mut described) if described.contains_key("value") => {
            described.remove("value").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Text form of a JSON value: strings verbatim, anything else as JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Prefix of the environment variables that carry fixture outputs.
pub const OUTPUT_ENV_PREFIX: &str = "FIXTURE_";

/// `cluster-id` becomes `FIXTURE_CLUSTER_ID`.
pub fn env_var_name(output_name: &str) -> String {
    let sanitized = output_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect::<String>();
    format!("{OUTPUT_ENV_PREFIX}{sanitized}")
}

/// Fixture provider that shells out to the configured commands.
/// 调用配置命令的夹具提供者。
#[derive(Debug, Clone)]
pub struct ShellFixture {
    config: FixtureConfig,
    working_dir: PathBuf,
}

impl ShellFixture {
    /// `base_dir` is the directory relative paths in `config` refer to,
    /// normally the directory holding the suite file.
    pub fn new(config: FixtureConfig, base_dir: &Path) -> Self {
        let working_dir = match &config.working_dir {
            Some(dir) => resolve_relative(base_dir, dir),
            None => base_dir.to_path_buf(),
        };
        Self { config, working_dir }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.config.env
    }

    async fn run_step(&self, step: &str, command_line: &str) -> Result<CapturedOutput> {
        println!(
            "{} {}",
            t!("fixture.command_prefix", step = step).blue(),
            command_line
        );
        let mut cmd = command::build_command(command_line, &self.config.env)?;
        cmd.current_dir(&self.working_dir);

        let output = command::run_captured(cmd).await?;
        tracing::debug!(step, status = %output.status, "fixture command finished");

        if !output.status.success() {
            bail!(
                "{}\n{}",
                t!("fixture.command_failed", step = step, status = output.status),
                output.combined().trim()
            );
        }
        Ok(output)
    }

    async fn apply(&self) -> Result<()> {
        if let Some(provision) = &self.config.provision {
            let output = self.run_step("provision", provision).await?;
            print_log(&output);
        }
        Ok(())
    }

    async fn load_outputs(&self) -> Result<FixtureOutputs> {
        let Some(outputs) = &self.config.outputs else {
            return Ok(FixtureOutputs::default());
        };
        let output = self.run_step("outputs", outputs).await?;
        let parsed = FixtureOutputs::from_json(&output.stdout)?;
        println!("{}", t!("fixture.outputs_loaded", count = parsed.len()).cyan());
        Ok(parsed)
    }
}

impl FixtureProvider for ShellFixture {
    type Handle = FixtureOutputs;

    async fn provision(&self) -> Result<FixtureOutputs> {
        self.apply().await?;
        self.load_outputs().await
    }

    /// Runs the `teardown` command whether or not provisioning finished, so
    /// a half-applied fixture is destroyed as well.
    async fn teardown(&self, _handle: Option<&FixtureOutputs>) -> Result<()> {
        if let Some(teardown) = &self.config.teardown {
            let output = self.run_step("teardown", teardown).await?;
            print_log(&output);
        }
        Ok(())
    }
}

fn print_log(output: &CapturedOutput) {
    let log = output.combined();
    if !log.trim().is_empty() {
        println!("{}", log.trim());
    }
}
