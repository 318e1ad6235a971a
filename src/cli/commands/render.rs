//! # Render Command Module / 渲染命令模块
//!
//! Re-renders a JSON report saved by an earlier `run`: the console summary
//! always, and an HTML document when `--html` is given.
//!
//! 重新渲染先前 `run` 保存的 JSON 报告：总是输出控制台摘要，指定 `--html` 时还会生成 HTML 文档。

use anyhow::Result;
use colored::*;
use std::path::Path;

use crate::infra::t;
use crate::reporting::{print_summary, read_json_report, write_html_report};

pub fn execute(from: &Path, html: Option<&Path>, locale: &str) -> Result<()> {
    let report = read_json_report(from)?;
    print_summary(&report, locale);

    if let Some(path) = html {
        write_html_report(&report, path, locale)?;
        println!("{}", t!("report.html_written", locale = locale, path = path.display()).cyan());
    }
    Ok(())
}
