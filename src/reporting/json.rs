//! # JSON Reporting Module / JSON 报告模块
//!
//! Writes a [`Report`] as pretty-printed JSON with stable snake_case field
//! names, and reads it back.
//!
//! 将 [`Report`] 写为字段名稳定（snake_case）的格式化 JSON，并可将其读回。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::infra::fs::write_atomically;
use crate::infra::t;
use crate::reporting::report::Report;

/// Serializes `report` to `output_path`, overwriting any existing file.
///
/// # Errors
/// Returns an error if the file cannot be created or written, for example
/// when the parent directory does not exist. The `std::io::Error` is kept as
/// the error's source.
///
/// 将 `report` 序列化到 `output_path`，覆盖已有文件。
/// 如果无法创建或写入文件（例如父目录不存在），则返回错误，并保留 `std::io::Error` 作为错误来源。
pub fn write_json_report(report: &Report, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    write_atomically(output_path, json.as_bytes())
        .with_context(|| t!("report.write_failed", path = output_path.display()).to_string())
}

/// Parses a report previously written by [`write_json_report`].
/// 解析先前由 [`write_json_report`] 写出的报告。
pub fn read_json_report(path: &Path) -> Result<Report> {
    let content = fs::read_to_string(path)
        .with_context(|| t!("report.read_failed", path = path.display()).to_string())?;
    serde_json::from_str(&content)
        .with_context(|| t!("report.parse_failed", path = path.display()).to_string())
}
