//! # Report Module / 报告模块
//!
//! Aggregates a finished suite's results and its start and end timestamps
//! into a [`Report`]. The report never filters or reorders results.
//!
//! 将已完成套件的结果及其开始和结束时间戳聚合为 [`Report`]。报告从不过滤或重排结果。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::models::{CheckResult, Status};

/// Counts per status plus the suite's wall-clock duration.
/// 各状态的计数以及套件的实际耗时。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total: usize,
    /// `end_time - start_time`, not the sum of check durations.
    /// `end_time - start_time`，而不是各检查耗时之和。
    pub total_duration: Duration,
}

impl Summary {
    fn from_results(results: &[CheckResult], total_duration: Duration) -> Self {
        let mut summary = Summary {
            total: results.len(),
            total_duration,
            ..Summary::default()
        };
        for result in results {
            match result.status() {
                Status::Pass => summary.passed += 1,
                Status::Fail => summary.failed += 1,
                Status::Skip => summary.skipped += 1,
            }
        }
        summary
    }

    /// Fraction of checks that passed, or `None` for an empty suite.
    /// 通过检查所占的比例；空套件返回 `None`。
    pub fn pass_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.passed as f64 / self.total as f64)
        }
    }
}

/// The aggregated outcome of one suite run.
/// 一次套件运行的聚合结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    results: Vec<CheckResult>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    summary: Summary,
}

impl Report {
    /// Builds a report. An `end_time` earlier than `start_time` is clamped
    /// to `start_time`.
    pub fn new(results: Vec<CheckResult>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        let end_time = end_time.max(start_time);
        let total_duration = (end_time - start_time).to_std().unwrap_or_default();
        let summary = Summary::from_results(&results, total_duration);
        Self {
            results,
            start_time,
            end_time,
            summary,
        }
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn total_duration(&self) -> Duration {
        self.summary.total_duration
    }

    pub fn pass_rate(&self) -> Option<f64> {
        self.summary.pass_rate()
    }

    /// True if any check failed.
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    /// Results that failed, in execution order.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.is_failure())
    }
}
