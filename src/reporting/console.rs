//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints a colorful, localized summary of a [`Report`] to the
//! console: the suite totals first, then one line per check.
//!
//! 此模块在控制台打印 [`Report`] 的彩色本地化摘要：先打印套件总计，再逐行打印每个检查。

use colored::*;

use crate::core::models::{CheckResult, Status};
use crate::infra::t;
use crate::reporting::report::Report;

/// Error details longer than this are cut in the console summary.
/// 控制台摘要中超过此长度的错误详情会被截断。
pub const MAX_DETAIL_CHARS: usize = 120;

/// Prints a formatted summary of the report to the console.
///
/// # Output Format / 输出格式
/// ```text
/// --- Check Summary ---
///   Total: 3 | Passed: 1 | Failed: 1 | Skipped: 1 | Duration: 4.21s | Pass rate: 33.3%
///   - PASS   | ClusterCreated                           |     1.23s
///   - FAIL   | EncryptionEnabled                        |   450.00ms  assertions failed
///   - SKIP   | EndpointReachable                        |     2.10ms
/// ```
pub fn print_summary(report: &Report, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    let summary = report.summary();
    println!(
        "  {}",
        t!(
            "report.summary_totals",
            locale = locale,
            total = summary.total,
            passed = summary.passed.to_string().green(),
            failed = summary.failed.to_string().red(),
            skipped = summary.skipped.to_string().dimmed(),
            duration = format!("{:.2?}", summary.total_duration),
            rate = format_pass_rate(summary.pass_rate())
        )
    );

    for result in report.results() {
        println!("{}", summary_line(result, locale));
    }
}

fn summary_line(result: &CheckResult, locale: &str) -> String {
    let status_str = result.status().label(locale);
    let status_colored = match result.status() {
        Status::Pass => status_str.green(),
        Status::Fail => status_str.red(),
        Status::Skip => status_str.dimmed(),
    };
    let duration_str = format!("{:.2?}", result.duration());

    let mut line = format!(
        "  - {:<8} | {:<40} | {:>10}",
        status_colored,
        result.name(),
        duration_str
    );
    if let Some(detail) = result.error_detail() {
        line.push_str("  ");
        line.push_str(&truncate_detail(detail, MAX_DETAIL_CHARS).red().to_string());
    }
    line
}

/// Shortens `detail` to at most `max_chars` characters on one line,
/// marking a cut with `...`.
/// 将 `detail` 缩短为最多 `max_chars` 个字符的单行文本，截断时以 `...` 标记。
pub fn truncate_detail(detail: &str, max_chars: usize) -> String {
    let single_line = detail.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let keep = max_chars.saturating_sub(3);
    let mut truncated: String = single_line.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

/// Formats a pass rate as a percentage, or `N/A` when there were no checks.
pub fn format_pass_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}%", rate * 100.0),
        None => "N/A".to_string(),
    }
}
