//! # Suite Configuration Module / 套件配置模块
//!
//! Defines the TOML suite file (`[fixture]`, `[report]` and `[[checks]]`),
//! loads it with `serde` and validates it before anything runs.
//!
//! 定义 TOML 套件文件（`[fixture]`、`[report]` 和 `[[checks]]`），
//! 使用 `serde` 加载并在运行前进行校验。

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::t;

/// Exit code a command check uses to report that it skipped itself.
/// 命令检查用来表示自身被跳过的退出码。
pub const DEFAULT_SKIP_EXIT_CODE: i32 = 77;

/// Represents a single check defined in the suite configuration.
/// A check either runs a `command` or inspects a fixture `output`.
/// 代表套件配置中定义的单个检查。
/// 一个检查要么运行 `command`，要么检查夹具的某个 `output`。
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CheckSpec {
    /// The unique name of the check, used in logs and reports.
    /// 检查的唯一名称，用于日志和报告中。
    pub name: String,
    /// A shell-style command line. Fixture outputs are exported to it as
    /// `FIXTURE_<NAME>` environment variables.
    /// shell 风格的命令行。夹具输出以 `FIXTURE_<NAME>` 环境变量的形式传给它。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Exit code that marks a command check as skipped (default 77).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_exit_code: Option<i32>,
    /// Name of the fixture output this check inspects.
    /// 此检查所检查的夹具输出名称。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// The output must not be null, an empty string or an empty collection.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_empty: bool,
    /// The output (or every element of it) must contain this text. An empty
    /// list or map fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    /// The output (or every element of it) must start with this text. An
    /// empty list or map fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    /// Keys the output map must contain.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    /// Minimum number of entries in the output map or list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_entries: Option<usize>,
    /// Optional timeout in seconds; overrides the suite default.
    /// 可选的超时时间（秒），覆盖套件默认值。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl CheckSpec {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn has_expectations(&self) -> bool {
        self.not_empty
            || self.contains.is_some()
            || self.starts_with.is_some()
            || !self.keys.is_empty()
            || self.min_entries.is_some()
    }
}

/// Shell commands that create, describe and destroy the fixture.
/// 创建、描述和销毁夹具的 shell 命令。
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FixtureConfig {
    /// Directory the commands run in, relative to the configuration file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    /// Command that provisions the fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provision: Option<String>,
    /// Command whose stdout is a JSON object of named outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<String>,
    /// Command that destroys the fixture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown: Option<String>,
    /// Environment variables set for every fixture and check command.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

/// Where the file reports go. Command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<PathBuf>,
}

/// Represents the entire suite configuration, loaded from a TOML file.
/// 代表从 TOML 文件加载的整个套件配置。
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CheckSuite {
    /// The language for output messages (e.g., "en", "zh-CN"). When absent the
    /// system locale is used.
    /// 输出消息的语言（例如 "en", "zh-CN"）。未指定时使用系统语言。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// How many checks may run at once. Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    /// Default per-check timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub fixture: FixtureConfig,
    /// A vector containing all the checks, in execution order.
    /// 一个包含所有检查的向量，按执行顺序排列。
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

impl CheckSuite {
    pub fn default_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validates the suite: unique, non-empty names and exactly one of
    /// `command` / `output` per check.
    ///
    /// 校验套件：名称唯一且非空，每个检查恰好指定 `command` 或 `output` 之一。
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for check in &self.checks {
            if check.name.trim().is_empty() {
                bail!("{}", t!("config.empty_name"));
            }
            if !seen.insert(check.name.as_str()) {
                bail!("{}", t!("run.duplicate_check", name = &check.name));
            }
            match (&check.command, &check.output) {
                (Some(_), Some(_)) | (None, None) => {
                    bail!("{}", t!("config.command_or_output", name = &check.name));
                }
                (Some(_), None) if check.has_expectations() => {
                    bail!("{}", t!("config.expectations_need_output", name = &check.name));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Reads, parses and validates a suite file.
/// 读取、解析并校验套件文件。
pub fn load_check_suite(path: &Path) -> Result<CheckSuite> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
    parse_check_suite(&content)
}

/// Parses and validates a suite from TOML text.
pub fn parse_check_suite(content: &str) -> Result<CheckSuite> {
    let suite: CheckSuite =
        toml::from_str(content).with_context(|| t!("config.parse_failed").to_string())?;
    suite.validate()?;
    Ok(suite)
}
