//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a [`Report`] as a standalone HTML document: a summary
//! table followed by a detail table with one row per check. Styles and the
//! small detail-toggle script are embedded, so the file has no external
//! assets. Every check name and error detail goes through `maud`'s escaping.
//!
//! 此模块将 [`Report`] 渲染为独立的 HTML 文档：先是摘要表，然后是每个检查一行的详情表。
//! 样式和用于展开详情的小脚本都是内嵌的，因此文件没有外部资源依赖。
//! 所有检查名称和错误详情都经过 `maud` 的转义。

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::path::Path;

use crate::infra::fs::write_atomically;
use crate::infra::t;
use crate::reporting::console::format_pass_rate;
use crate::reporting::report::Report;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = include_str!("assets/report.js");

/// Renders `report` and writes it to `output_path`, overwriting any existing file.
///
/// # Arguments / 参数
/// * `report` - The report to render
///              要渲染的报告
/// * `output_path` - The file path where the HTML report will be saved
///                   保存 HTML 报告的文件路径
/// * `locale` - The locale to use for labels
///              标签使用的语言环境
///
/// # Errors / 错误
/// Returns an error if the file cannot be created or written.
/// 如果无法创建或写入文件，则返回错误。
pub fn write_html_report(report: &Report, output_path: &Path, locale: &str) -> Result<()> {
    let document = render_html(report, locale);
    write_atomically(output_path, document.as_bytes())
        .with_context(|| t!("report.write_failed", path = output_path.display()).to_string())
}

/// Renders `report` to an HTML string.
/// 将 `report` 渲染为 HTML 字符串。
pub fn render_html(report: &Report, locale: &str) -> String {
    let summary = report.summary();
    let title = t!("html_report.title", locale = locale).to_string();

    let markup = html! {
        (DOCTYPE)
        html lang=(locale) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale).to_string()) }
                p.timestamps {
                    (t!(
                        "html_report.timestamps",
                        locale = locale,
                        start = report.start_time().to_rfc3339(),
                        end = report.end_time().to_rfc3339()
                    ).to_string())
                }

                table.summary {
                    tbody {
                        (summary_row(&t!("html_report.summary.total", locale = locale), summary.total.to_string(), ""))
                        (summary_row(&t!("html_report.summary.passed", locale = locale), summary.passed.to_string(), "passed-text"))
                        (summary_row(&t!("html_report.summary.failed", locale = locale), summary.failed.to_string(), "failed-text"))
                        (summary_row(&t!("html_report.summary.skipped", locale = locale), summary.skipped.to_string(), "skipped-text"))
                        (summary_row(&t!("html_report.summary.duration", locale = locale), format!("{:.2}s", summary.total_duration.as_secs_f64()), ""))
                        (summary_row(&t!("html_report.summary.pass_rate", locale = locale), format_pass_rate(summary.pass_rate()), ""))
                    }
                }

                table.details {
                    thead {
                        tr {
                            th { (t!("html_report.table.header.name", locale = locale).to_string()) }
                            th.status-col { (t!("html_report.table.header.status", locale = locale).to_string()) }
                            th.duration-cell { (t!("html_report.table.header.duration", locale = locale).to_string()) }
                            th { (t!("html_report.table.header.detail", locale = locale).to_string()) }
                        }
                    }
                    tbody {
                        @if report.results().is_empty() {
                            tr {
                                td.empty colspan="4" { (t!("html_report.no_checks", locale = locale).to_string()) }
                            }
                        }
                        @for (i, result) in report.results().iter().enumerate() {
                            tr {
                                td.name { (result.name()) }
                                td.status-col {
                                    span class=(format!("status-cell {}", result.status().css_class())) {
                                        span.indicator {}
                                        (result.status().label(locale))
                                    }
                                }
                                td.duration-cell { (format!("{:.2}s", result.duration().as_secs_f64())) }
                                td.detail {
                                    @if let Some(detail) = result.error_detail() {
                                        div.output-toggle data-target=(format!("detail-{i}")) {
                                            (t!("html_report.toggle_output", locale = locale).to_string())
                                        }
                                        pre.output-content id=(format!("detail-{i}")) { (detail) }
                                    }
                                }
                            }
                        }
                    }
                }
                script { (PreEscaped(HTML_SCRIPT)) }
            }
        }
    };

    markup.into_string()
}

fn summary_row(label: &str, value: String, class: &str) -> Markup {
    html! {
        tr {
            th { (label) }
            td class=(class) { (value) }
        }
    }
}
