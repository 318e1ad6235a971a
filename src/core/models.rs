//! # Data Models Module / 数据模型模块
//!
//! This module defines the record produced for every executed check.
//! A [`CheckResult`] carries the check's name, its wall-clock duration and an
//! [`Outcome`]; the outcome enum makes it impossible to build a passing or
//! skipped result that carries an error detail, or a failure without one.
//!
//! 此模块定义了每个已执行检查所产生的记录。
//! [`CheckResult`] 包含检查名称、实际耗时以及 [`Outcome`]；
//! 该枚举保证通过或跳过的结果不会携带错误详情，而失败的结果一定携带。

use crate::infra::t;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Error detail recorded when a check marked itself failed.
/// 当检查将自身标记为失败时记录的错误详情。
pub const ASSERTIONS_FAILED: &str = "assertions failed";

/// The three statuses a check can end in.
/// 检查可能的三种最终状态。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
    Skip,
}

impl Status {
    /// Stable, untranslated name used in structured output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Skip => "SKIP",
        }
    }

    /// Localized label for console and HTML output.
    /// 用于控制台和 HTML 输出的本地化标签。
    pub fn label(&self, locale: &str) -> String {
        match self {
            Status::Pass => t!("report.status_passed", locale = locale).to_string(),
            Status::Fail => t!("report.status_failed", locale = locale).to_string(),
            Status::Skip => t!("report.status_skipped", locale = locale).to_string(),
        }
    }

    /// Gets the appropriate CSS class for the status.
    pub fn css_class(&self) -> &'static str {
        match self {
            Status::Pass => "status-Passed",
            Status::Fail => "status-Failed",
            Status::Skip => "status-Skipped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enumerates why a check failed.
/// This helps in categorizing errors for reporting.
/// 枚举检查失败的原因，便于在报告中对错误进行分类。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The check marked itself failed (its assertions did not hold).
    /// 检查将自身标记为失败（断言不成立）。
    Assertion,
    /// The check body panicked; the payload is the error detail.
    /// 检查体发生 panic；其负载即为错误详情。
    Panic,
    /// The check exceeded its configured timeout.
    /// 检查超出了其配置的超时时间。
    Timeout,
    /// The task running the check was cancelled or lost by the runtime.
    /// 运行检查的任务被运行时取消或丢失。
    Aborted,
}

/// How a check ended. Serialized inline into [`CheckResult`] as a `status`
/// tag plus, for failures, `reason` and `error_detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Outcome {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail {
        reason: FailureReason,
        error_detail: String,
    },
    #[serde(rename = "SKIP")]
    Skip,
}

impl Outcome {
    /// Classifies the terminal state of a check body.
    ///
    /// Priority is fixed: a recovered panic wins over a recorded failure,
    /// which wins over an explicit skip. Anything else passes.
    ///
    /// 对检查体的最终状态进行分类。
    /// 优先级固定：捕获的 panic 优先于记录的失败，记录的失败优先于显式跳过，其余情况均为通过。
    pub fn classify(panic_payload: Option<String>, failed: bool, skipped: bool) -> Self {
        if let Some(payload) = panic_payload {
            Outcome::Fail {
                reason: FailureReason::Panic,
                error_detail: payload,
            }
        } else if failed {
            Outcome::Fail {
                reason: FailureReason::Assertion,
                error_detail: ASSERTIONS_FAILED.to_string(),
            }
        } else if skipped {
            Outcome::Skip
        } else {
            Outcome::Pass
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Outcome::Pass => Status::Pass,
            Outcome::Fail { .. } => Status::Fail,
            Outcome::Skip => Status::Skip,
        }
    }
}

/// Represents the final result of a single check.
/// Created once the check returns or terminates abnormally and never
/// modified afterwards.
///
/// 表示单个检查的最终结果。
/// 在检查返回或异常终止后创建，此后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    name: String,
    duration: Duration,
    #[serde(flatten)]
    outcome: Outcome,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, duration: Duration, outcome: Outcome) -> Self {
        Self {
            name: name.into(),
            duration,
            outcome,
        }
    }

    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self::new(name, duration, Outcome::Pass)
    }

    pub fn failed(
        name: impl Into<String>,
        duration: Duration,
        reason: FailureReason,
        error_detail: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            duration,
            Outcome::Fail {
                reason,
                error_detail: error_detail.into(),
            },
        )
    }

    pub fn skipped(name: impl Into<String>, duration: Duration) -> Self {
        Self::new(name, duration, Outcome::Skip)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn status(&self) -> Status {
        self.outcome.status()
    }

    /// Gets the error detail. Only failures carry one.
    /// 获取错误详情，只有失败的结果才有。
    pub fn error_detail(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Fail { error_detail, .. } => Some(error_detail),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match &self.outcome {
            Outcome::Fail { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Checks if the result is any kind of failure.
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Fail { .. })
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {:.2?}", self.name, self.status(), self.duration)?;
        if let Some(detail) = self.error_detail() {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

