//! # Harness Module / 执行器模块
//!
//! This module runs an ordered list of named checks against one shared
//! fixture. Every check is spawned onto the tokio runtime and wrapped by the
//! result recorder, so a check that fails, panics or times out never stops
//! the checks after it. Results always come back in input order.
//!
//! 此模块针对一个共享夹具运行有序的命名检查列表。
//! 每个检查都被派生到 tokio 运行时并由结果记录器包装，
//! 因此失败、panic 或超时的检查永远不会阻止后续检查。结果始终按输入顺序返回。

use anyhow::{Result, bail};
use colored::*;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, stream};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::context::CheckContext;
use crate::core::models::{CheckResult, FailureReason, Status};
use crate::core::recorder;
use crate::infra::t;

type CheckFn<F> = Arc<dyn Fn(Arc<F>, CheckContext) -> BoxFuture<'static, ()> + Send + Sync>;

/// A named check body that reads from a fixture of type `F`.
/// 一个读取类型为 `F` 的夹具的命名检查体。
pub struct Check<F> {
    name: String,
    timeout: Option<Duration>,
    body: CheckFn<F>,
}

impl<F> Check<F>
where
    F: Send + Sync + 'static,
{
    /// Creates a check from an async body.
    ///
    /// ```no_run
    /// use check_runner::{Check, CheckContext};
    /// use std::sync::Arc;
    ///
    /// let check = Check::new("cluster-id", |outputs: Arc<Vec<String>>, ctx: CheckContext| async move {
    ///     ctx.require(!outputs.is_empty(), "cluster id should not be empty");
    /// });
    /// ```
    pub fn new<B, Fut>(name: impl Into<String>, body: B) -> Self
    where
        B: Fn(Arc<F>, CheckContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name: name.into(),
            timeout: None,
            body: Arc::new(move |fixture, ctx| body(fixture, ctx).boxed()),
        }
    }

    /// Overrides the harness-wide default timeout for this check.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl<F> Clone for Check<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            timeout: self.timeout,
            body: Arc::clone(&self.body),
        }
    }
}

impl<F> fmt::Debug for Check<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Runs checks against a shared fixture and collects one result per check.
///
/// The harness never owns the fixture's lifecycle: it only holds an `Arc`
/// to a handle that was provisioned elsewhere (see [`crate::core::fixture`]).
///
/// 针对共享夹具运行检查，并为每个检查收集一个结果。
/// 执行器从不负责夹具的生命周期：它只持有一个在别处创建的句柄的 `Arc`。
pub struct Harness<F> {
    fixture: Arc<F>,
    checks: Vec<Check<F>>,
    jobs: usize,
    default_timeout: Option<Duration>,
    stop_token: CancellationToken,
}

impl<F> Harness<F>
where
    F: Send + Sync + 'static,
{
    pub fn new(fixture: Arc<F>) -> Self {
        Self {
            fixture,
            checks: Vec::new(),
            jobs: 1,
            default_timeout: None,
            stop_token: CancellationToken::new(),
        }
    }

    pub fn check(mut self, check: Check<F>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn checks(mut self, checks: impl IntoIterator<Item = Check<F>>) -> Self {
        self.checks.extend(checks);
        self
    }

    /// Number of checks allowed to run at once. `1` (the default) runs them
    /// one after another; `0` is treated as `1`.
    /// 允许同时运行的检查数量。默认 `1` 表示依次运行；`0` 按 `1` 处理。
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Timeout applied to checks that do not set their own.
    pub fn default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Once `token` is cancelled, checks that have not started yet are
    /// recorded as skipped. Checks already running are left to finish.
    ///
    /// 一旦 `token` 被取消，尚未开始的检查会被记录为跳过，已在运行的检查会继续运行至结束。
    pub fn stop_token(mut self, token: CancellationToken) -> Self {
        self.stop_token = token;
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Runs every check and returns their results in input order.
    ///
    /// # Errors
    /// Fails before running anything if two checks share a name. Check
    /// failures are never returned as errors.
    ///
    /// 运行所有检查并按输入顺序返回结果。
    /// 如果两个检查同名，则在运行任何检查之前返回错误；检查本身的失败永远不会作为错误返回。
    pub async fn run(self) -> Result<Vec<CheckResult>> {
        ensure_unique_names(&self.checks)?;

        let Harness {
            fixture,
            checks,
            jobs,
            default_timeout,
            stop_token,
        } = self;
        let total = checks.len();

        let results = stream::iter(checks.into_iter().enumerate().map(|(index, check)| {
            let fixture = Arc::clone(&fixture);
            let stop_token = stop_token.clone();
            run_single_check(index + 1, total, check, fixture, default_timeout, stop_token)
        }))
        .buffered(jobs)
        .collect::<Vec<CheckResult>>()
        .await;

        Ok(results)
    }
}

fn ensure_unique_names<F>(checks: &[Check<F>]) -> Result<()> {
    let mut seen = HashSet::with_capacity(checks.len());
    for check in checks {
        if !seen.insert(check.name.as_str()) {
            bail!("{}", t!("run.duplicate_check", name = &check.name));
        }
    }
    Ok(())
}

async fn run_single_check<F>(
    position: usize,
    total: usize,
    check: Check<F>,
    fixture: Arc<F>,
    default_timeout: Option<Duration>,
    stop_token: CancellationToken,
) -> CheckResult
where
    F: Send + Sync + 'static,
{
    let Check {
        name,
        timeout,
        body,
    } = check;

    if stop_token.is_cancelled() {
        println!("{}", t!("run.check_cancelled", name = &name).yellow());
        return CheckResult::skipped(name, Duration::ZERO);
    }

    println!(
        "{}",
        t!("run.running_check", index = position, total = total, name = &name).blue()
    );
    tracing::debug!(check = %name, position, total, "check started");

    let timeout = timeout.or(default_timeout);
    let task_name = name.clone();
    let handle = tokio::spawn(async move {
        recorder::record(&task_name, timeout, move |ctx| body(fixture, ctx)).await
    });

    let result = match handle.await {
        Ok(result) => result,
        Err(e) => CheckResult::failed(name, Duration::ZERO, FailureReason::Aborted, e.to_string()),
    };

    announce(&result);
    tracing::debug!(check = %result.name(), status = %result.status(), duration = ?result.duration(), "check finished");
    result
}

fn announce(result: &CheckResult) {
    let duration = format!("{:.2?}", result.duration());
    match result.status() {
        Status::Pass => println!(
            "{}",
            t!("run.check_passed", name = result.name(), duration = &duration).green()
        ),
        Status::Fail => println!(
            "{}",
            t!(
                "run.check_failed",
                name = result.name(),
                duration = &duration,
                detail = result.error_detail().unwrap_or_default()
            )
            .red()
        ),
        Status::Skip => println!(
            "{}",
            t!("run.check_skipped", name = result.name(), duration = &duration).dimmed()
        ),
    }
}
