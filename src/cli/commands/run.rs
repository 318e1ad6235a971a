//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: it loads a suite file,
//! provisions the fixture, runs every check against it, tears the fixture
//! down, and renders the report to the console and the requested files.
//!
//! 此模块实现了 `run` 命令：加载套件文件，创建夹具，针对夹具运行所有检查，
//! 销毁夹具，并将报告渲染到控制台和指定的文件。

use anyhow::{Result, bail};
use chrono::Utc;
use colored::*;
use std::path::{Path, PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::core::config::{CheckSuite, load_check_suite};
use crate::core::declarative::{CommandEnvironment, build_checks};
use crate::core::fixture::with_fixture;
use crate::core::harness::Harness;
use crate::infra::fs::resolve_relative;
use crate::infra::shell_fixture::ShellFixture;
use crate::infra::t;
use crate::reporting::{Report, print_summary, write_html_report, write_json_report};

/// Arguments of the `run` subcommand.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub config: PathBuf,
    pub jobs: Option<usize>,
    pub json: Option<PathBuf>,
    pub html: Option<PathBuf>,
    /// Language given with `--lang`; takes precedence over the suite's.
    pub lang: Option<String>,
    /// Language used when neither `--lang` nor the suite sets one.
    pub fallback_lang: String,
}

/// Executes the run command with the provided arguments.
///
/// # Errors
/// Returns an error when the suite cannot be loaded. After the run it also
/// fails when the fixture could not be provisioned or torn down, when any
/// check failed, or when a report could not be written. Every report is
/// attempted before the error is returned; a failed provision produces a
/// report with no results.
///
/// 使用提供的参数执行 run 命令。
/// 当套件无法加载时返回错误；运行结束后，如果夹具无法创建或销毁、有检查失败或报告无法写入，
/// 也会返回错误。返回错误之前会尝试写出所有报告；创建失败时会写出不含结果的报告。
pub async fn execute(args: RunArgs) -> Result<()> {
    let suite = load_check_suite(&args.config)?;
    let locale = select_locale(&args, &suite);
    rust_i18n::set_locale(&locale);

    println!(
        "{}",
        t!("run.loaded_suite", locale = &locale, path = args.config.display(), count = suite.checks.len()).cyan()
    );

    let base_dir = config_dir(&args.config);
    let fixture = ShellFixture::new(suite.fixture.clone(), &base_dir);
    let environment = CommandEnvironment {
        working_dir: fixture.working_dir().to_path_buf(),
        env: suite.fixture.env.clone(),
    };
    let checks = build_checks(&suite.checks, &environment)?;
    let jobs = args.jobs.or(suite.jobs).unwrap_or(1);
    let default_timeout = suite.default_timeout();
    let stop_token = setup_signal_handler(&locale);

    let start_time = Utc::now();
    let fixture_run = with_fixture(&fixture, |outputs| async move {
        Harness::new(outputs)
            .checks(checks)
            .jobs(jobs)
            .default_timeout(default_timeout)
            .stop_token(stop_token)
            .run()
            .await
    })
    .await;

    // A failed provision still leaves an empty report behind.
    let mut problems = Vec::new();
    let (results, teardown_error) = match fixture_run {
        Ok(scoped) => (scoped.value?, scoped.teardown_error),
        Err(e) => {
            problems.push(format!("{e:#}"));
            (Vec::new(), None)
        }
    };
    let report = Report::new(results, start_time, Utc::now());

    print_summary(&report, &locale);

    let json_path = args
        .json
        .clone()
        .or_else(|| suite.report.json.as_ref().map(|p| resolve_relative(&base_dir, p)));
    if let Some(path) = json_path {
        match write_json_report(&report, &path) {
            Ok(()) => println!("{}", t!("report.json_written", locale = &locale, path = path.display()).cyan()),
            Err(e) => problems.push(format!("{e:#}")),
        }
    }

    let html_path = args
        .html
        .clone()
        .or_else(|| suite.report.html.as_ref().map(|p| resolve_relative(&base_dir, p)));
    if let Some(path) = html_path {
        match write_html_report(&report, &path, &locale) {
            Ok(()) => println!("{}", t!("report.html_written", locale = &locale, path = path.display()).cyan()),
            Err(e) => problems.push(format!("{e:#}")),
        }
    }

    if let Some(e) = teardown_error {
        problems.push(format!("{}: {e:#}", t!("fixture.teardown_failed", locale = &locale)));
    }

    if report.has_failures() {
        problems.insert(
            0,
            t!("run.checks_failed", locale = &locale, count = report.summary().failed).to_string(),
        );
    }

    if !problems.is_empty() {
        bail!("{}", problems.join("\n"));
    }

    println!("\n{}", t!("run.all_checks_passed", locale = &locale).green().bold());
    Ok(())
}

fn select_locale(args: &RunArgs, suite: &CheckSuite) -> String {
    match (&args.lang, &suite.language) {
        (Some(lang), _) => crate::resolve_locale(lang),
        (None, Some(lang)) => crate::resolve_locale(lang),
        (None, None) => args.fallback_lang.clone(),
    }
}

/// Directory that relative paths inside the suite file refer to.
fn config_dir(config: &Path) -> PathBuf {
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Cancels the returned token on Ctrl-C so checks that have not started yet
/// are skipped. The fixture is still torn down.
fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal", locale = &locale).yellow());
            token_clone.cancel();
        }
    });

    token
}
