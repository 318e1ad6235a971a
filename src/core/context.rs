//! # Check Context Module / 检查上下文模块
//!
//! A [`CheckContext`] is handed to every check body. It lets the body mark
//! the check failed or skipped, either continuing afterwards or stopping on
//! the spot, and log progress lines tagged with the check's name.
//!
//! 每个检查体都会获得一个 [`CheckContext`]。检查体可以通过它将检查标记为失败或跳过，
//! 之后继续执行或立即停止，并输出带有检查名称的日志。

use colored::*;
use std::panic;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Unwind payload used by [`CheckContext::fail_now`]. Raised with
/// `resume_unwind`, so the panic hook never prints it.
pub(crate) struct FailNow;

/// Unwind payload used by [`CheckContext::skip_now`].
pub(crate) struct SkipNow;

/// Returns true if the unwind payload came from `fail_now` or `skip_now`.
pub(crate) fn is_control_unwind(payload: &(dyn std::any::Any + Send)) -> bool {
    payload.is::<FailNow>() || payload.is::<SkipNow>()
}

#[derive(Debug)]
struct ContextState {
    name: String,
    failed: AtomicBool,
    skipped: AtomicBool,
}

/// Handle through which a running check reports on itself.
/// Cloning is cheap; all clones share the same flags.
///
/// 运行中的检查用来报告自身状态的句柄。
/// 克隆开销很小，所有克隆共享同一组标志。
#[derive(Debug, Clone)]
pub struct CheckContext {
    state: Arc<ContextState>,
}

impl CheckContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: Arc::new(ContextState {
                name: name.into(),
                failed: AtomicBool::new(false),
                skipped: AtomicBool::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Marks the check failed and keeps running.
    /// 将检查标记为失败并继续执行。
    pub fn fail(&self) {
        self.state.failed.store(true, Ordering::SeqCst);
    }

    /// Marks the check failed and stops the body immediately.
    /// 将检查标记为失败并立即停止检查体。
    pub fn fail_now(&self) -> ! {
        self.fail();
        panic::resume_unwind(Box::new(FailNow))
    }

    /// Marks the check skipped and keeps running.
    pub fn skip(&self) {
        self.state.skipped.store(true, Ordering::SeqCst);
    }

    /// Logs the reason, marks the check skipped and stops the body immediately.
    /// 记录原因，将检查标记为跳过并立即停止检查体。
    pub fn skip_now(&self, reason: impl AsRef<str>) -> ! {
        self.log(format!("{} {}", "skip:".dimmed(), reason.as_ref()));
        self.skip();
        panic::resume_unwind(Box::new(SkipNow))
    }

    pub fn failed(&self) -> bool {
        self.state.failed.load(Ordering::SeqCst)
    }

    pub fn skipped(&self) -> bool {
        self.state.skipped.load(Ordering::SeqCst)
    }

    /// Prints a line tagged with the check's name.
    pub fn log(&self, message: impl AsRef<str>) {
        println!("    {} {}", format!("[{}]", self.name()).dimmed(), message.as_ref());
    }

    /// Logs the message in red and marks the check failed.
    /// 以红色输出消息并将检查标记为失败。
    pub fn error(&self, message: impl AsRef<str>) {
        tracing::debug!(check = self.name(), message = message.as_ref(), "check error");
        self.log(message.as_ref().red().to_string());
        self.fail();
    }

    /// Soft assertion: on `false`, logs `message` and marks the check failed.
    /// Returns `condition` so callers can guard dependent assertions.
    ///
    /// 软断言：当条件为 `false` 时输出消息并标记失败。返回 `condition`，便于调用方保护后续断言。
    pub fn check(&self, condition: bool, message: impl AsRef<str>) -> bool {
        if !condition {
            self.error(message);
        }
        condition
    }

    /// Hard assertion: on `false`, logs `message` and stops the body.
    pub fn require(&self, condition: bool, message: impl AsRef<str>) {
        if !condition {
            self.error(message);
            self.fail_now();
        }
    }
}
