//! # Result Recorder Module / 结果记录器模块
//!
//! Turns one execution of a check body into exactly one [`CheckResult`].
//! The body runs behind a panic boundary and an optional timeout, so a
//! check that crashes or hangs is recorded as a failure instead of taking
//! the whole suite down with it.
//!
//! 将检查体的一次执行转换为恰好一个 [`CheckResult`]。
//! 检查体在 panic 边界和可选超时之内运行，因此崩溃或挂起的检查只会被记录为失败，
//! 而不会拖垮整个套件。

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use crate::core::context::{CheckContext, is_control_unwind};
use crate::core::models::{CheckResult, FailureReason, Outcome};

/// Error detail used when a panic payload is neither `&str` nor `String`.
pub const NON_STRING_PANIC: &str = "check panicked with a non-string payload";

/// Extracts a readable message from a panic payload.
/// 从 panic 负载中提取可读的消息。
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        NON_STRING_PANIC.to_string()
    }
}

/// Runs `body` once and records how it ended.
///
/// The timer starts before the body is invoked and the elapsed time is
/// attached whatever the outcome. When `timeout` elapses first the body's
/// future is dropped and the check fails with [`FailureReason::Timeout`].
/// Otherwise the outcome is classified by [`Outcome::classify`].
///
/// 运行一次 `body` 并记录其结束方式。
/// 计时器在调用检查体之前启动，无论结果如何都会附带耗时。
/// 如果先到达 `timeout`，检查体的 future 会被丢弃，检查以 [`FailureReason::Timeout`] 失败；
/// 否则由 [`Outcome::classify`] 进行分类。
pub async fn record<B, Fut>(name: &str, timeout: Option<Duration>, body: B) -> CheckResult
where
    B: FnOnce(CheckContext) -> Fut,
    Fut: Future<Output = ()>,
{
    let ctx = CheckContext::new(name);
    let body_ctx = ctx.clone();

    let start = Instant::now();
    // The body is invoked inside the guarded future so that a panic raised
    // while building its future is caught as well.
    let guarded = AssertUnwindSafe(async move { body(body_ctx).await }).catch_unwind();

    let finished = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(finished) => finished,
            Err(_) => {
                let duration = start.elapsed();
                tracing::debug!(check = name, ?limit, "check timed out");
                return CheckResult::failed(
                    name,
                    duration,
                    FailureReason::Timeout,
                    format!("timed out after {}s", limit.as_secs_f64()),
                );
            }
        },
        None => guarded.await,
    };
    let duration = start.elapsed();

    let panic_payload = match finished {
        Ok(()) => None,
        Err(payload) if is_control_unwind(&*payload) => None,
        Err(payload) => Some(panic_message(&*payload)),
    };

    CheckResult::new(
        name,
        duration,
        Outcome::classify(panic_payload, ctx.failed(), ctx.skipped()),
    )
}
