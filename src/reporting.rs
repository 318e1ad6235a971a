//! # Reporting Module / 报告模块
//!
//! This module aggregates check results into a [`report::Report`] and renders
//! it in three independent forms: a colorful console summary, a structured
//! JSON file, and a self-contained HTML document.
//!
//! 此模块将检查结果聚合为 [`report::Report`]，并以三种相互独立的形式渲染：
//! 彩色控制台摘要、结构化 JSON 文件和自包含的 HTML 文档。

pub mod console;
pub mod html;
pub mod json;
pub mod report;

// Re-export common reporting functions
pub use console::print_summary;
pub use html::write_html_report;
pub use json::{read_json_report, write_json_report};
pub use report::Report;
