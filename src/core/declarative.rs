//! # Declarative Checks Module / 声明式检查模块
//!
//! Builds harness [`Check`]s from the `[[checks]]` entries of a suite file.
//! A command check runs a process with the fixture outputs in its
//! environment; an output check evaluates a few fixed predicates on one
//! named output.
//!
//! 根据套件文件中的 `[[checks]]` 条目构建执行器的 [`Check`]。
//! 命令检查在环境变量中携带夹具输出来运行进程；输出检查对某个命名输出计算几个固定的谓词。

use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::config::{CheckSpec, DEFAULT_SKIP_EXIT_CODE};
use crate::core::context::CheckContext;
use crate::core::harness::Check;
use crate::infra::command;
use crate::infra::shell_fixture::{FixtureOutputs, value_text};
use crate::infra::t;

/// Settings shared by every command check of a suite. An empty
/// `working_dir` means the current directory.
#[derive(Debug, Clone, Default)]
pub struct CommandEnvironment {
    pub working_dir: PathBuf,
    pub env: BTreeMap<String, String>,
}

/// Builds one [`Check`] per [`CheckSpec`], preserving order.
/// 为每个规格构建一个 [`Check`]，保持顺序不变。
pub fn build_checks(
    specs: &[CheckSpec],
    environment: &CommandEnvironment,
) -> Result<Vec<Check<FixtureOutputs>>> {
    specs
        .iter()
        .map(|spec| build_check(spec, environment))
        .collect()
}

/// Builds the check described by `spec`.
pub fn build_check(spec: &CheckSpec, environment: &CommandEnvironment) -> Result<Check<FixtureOutputs>> {
    let check = match (&spec.command, &spec.output) {
        (Some(command_line), None) => command_check(spec, command_line.clone(), environment.clone()),
        (None, Some(output)) => output_check(spec, output.clone()),
        _ => anyhow::bail!("{}", t!("config.command_or_output", name = &spec.name)),
    };
    Ok(match spec.timeout() {
        Some(timeout) => check.with_timeout(timeout),
        None => check,
    })
}

fn command_check(
    spec: &CheckSpec,
    command_line: String,
    environment: CommandEnvironment,
) -> Check<FixtureOutputs> {
    let skip_exit_code = spec.skip_exit_code.unwrap_or(DEFAULT_SKIP_EXIT_CODE);
    let command_line = Arc::new(command_line);
    let environment = Arc::new(environment);

    Check::new(spec.name.clone(), move |outputs: Arc<FixtureOutputs>, ctx: CheckContext| {
        let command_line = Arc::clone(&command_line);
        let environment = Arc::clone(&environment);
        async move {
            let mut cmd = match command::build_command(&command_line, &environment.env) {
                Ok(cmd) => cmd,
                Err(e) => {
                    ctx.error(format!("{e:#}"));
                    ctx.fail_now();
                }
            };
            cmd.envs(outputs.env_vars());
            if !environment.working_dir.as_os_str().is_empty() {
                cmd.current_dir(&environment.working_dir);
            }

            let output = match command::run_captured(cmd).await {
                Ok(output) => output,
                Err(e) => {
                    ctx.error(format!("{e:#}"));
                    ctx.fail_now();
                }
            };

            let log = output.combined();
            for line in log.trim().lines() {
                ctx.log(line);
            }

            match output.status.code() {
                Some(0) => {}
                Some(code) if code == skip_exit_code => {
                    ctx.skip_now(t!("checks.command_skipped", code = code));
                }
                _ => ctx.error(t!("checks.command_failed", status = output.status)),
            }
        }
    })
}

fn output_check(spec: &CheckSpec, output_name: String) -> Check<FixtureOutputs> {
    let spec = Arc::new(spec.clone());
    let output_name = Arc::new(output_name);

    Check::new(spec.name.clone(), move |outputs: Arc<FixtureOutputs>, ctx: CheckContext| {
        let spec = Arc::clone(&spec);
        let output_name = Arc::clone(&output_name);
        async move {
            let Some(value) = outputs.get(&output_name) else {
                ctx.error(t!("checks.output_missing", output = output_name.as_str()));
                ctx.fail_now();
            };
            evaluate_expectations(&spec, &output_name, value, &ctx);
        }
    })
}

/// Evaluates every expectation in `spec` against `value`, recording each
/// violated one on `ctx`. All expectations are evaluated even after a
/// failure.
///
/// 针对 `value` 计算 `spec` 中的每个期望，并在 `ctx` 上记录每个未满足的期望。
/// 即使已有失败，所有期望仍会被计算。
pub fn evaluate_expectations(spec: &CheckSpec, output_name: &str, value: &Value, ctx: &CheckContext) {
    if spec.not_empty {
        ctx.check(
            !is_empty_value(value),
            t!("checks.output_empty", output = output_name),
        );
    }

    if let Some(min_entries) = spec.min_entries {
        let entries = entry_count(value);
        ctx.check(
            entries.is_some_and(|n| n >= min_entries),
            t!(
                "checks.too_few_entries",
                output = output_name,
                expected = min_entries,
                actual = entries.unwrap_or(0)
            ),
        );
    }

    if !spec.keys.is_empty() {
        let object = value.as_object();
        for key in &spec.keys {
            ctx.check(
                object.is_some_and(|o| o.contains_key(key)),
                t!("checks.key_missing", output = output_name, key = key),
            );
        }
    }

    let texts = element_texts(value);
    if texts.is_empty() && (spec.contains.is_some() || spec.starts_with.is_some()) {
        ctx.error(t!("checks.no_elements", output = output_name));
    }
    if let Some(needle) = &spec.contains {
        for (label, text) in &texts {
            ctx.check(
                text.contains(needle.as_str()),
                t!("checks.not_contains", output = label_for(output_name, label), expected = needle, actual = text),
            );
        }
    }
    if let Some(prefix) = &spec.starts_with {
        for (label, text) in &texts {
            ctx.check(
                text.starts_with(prefix.as_str()),
                t!("checks.not_starts_with", output = label_for(output_name, label), expected = prefix, actual = text),
            );
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn entry_count(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(entries) => Some(entries.len()),
        _ => None,
    }
}

/// Text predicates apply to a scalar itself, or to every element of a list
/// or map. Each element is labelled with its index or key. An empty list or
/// map yields nothing, which the caller reports as a failure.
fn element_texts(value: &Value) -> Vec<(Option<String>, String)> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (Some(i.to_string()), value_text(item)))
            .collect(),
        Value::Object(entries) => entries
            .iter()
            .map(|(key, item)| (Some(key.clone()), value_text(item)))
            .collect(),
        other => vec![(None, value_text(other))],
    }
}

fn label_for(output_name: &str, element: &Option<String>) -> String {
    match element {
        Some(element) => format!("{output_name}[{element}]"),
        None => output_name.to_string(),
    }
}
