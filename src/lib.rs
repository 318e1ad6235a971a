//! # Check Runner Library / Check Runner 库
//!
//! This library runs independently named checks against one shared,
//! expensive-to-create fixture, isolates every check's failure or panic,
//! and renders the collected results as console, JSON and HTML reports.
//!
//! 此库针对一个共享的、创建代价高昂的夹具运行多个独立命名的检查，
//! 隔离每个检查的失败或 panic，并将收集到的结果渲染为控制台、JSON 和 HTML 报告。
//!
//! ## Modules / 模块
//!
//! - `core` - Result models, the result recorder, the harness and fixture scoping
//! - `infra` - Process execution, the shell fixture provider and file writes
//! - `reporting` - Report aggregation and its three renderers
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 结果模型、结果记录器、执行器和夹具作用域
//! - `infra` - 进程执行、shell 夹具提供者和文件写入
//! - `reporting` - 报告聚合及其三种渲染器
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::context::CheckContext;
pub use crate::core::fixture::{FixtureProvider, Scoped, with_fixture};
pub use crate::core::harness::{Check, Harness};
pub use crate::core::models::{CheckResult, FailureReason, Status};
pub use crate::reporting::report::{Report, Summary};

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
///
/// Returns the locale that was selected.
pub fn init() -> String {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let lang = resolve_locale(&locale);
    rust_i18n::set_locale(&lang);
    lang
}

/// Maps a requested locale onto one that has translations.
/// 将请求的语言区域映射到一个有翻译的语言区域。
pub fn resolve_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&requested) {
        return requested.to_string();
    }

    let lang_code = requested.split(['-', '_']).next().unwrap_or_default();
    available_locales
        .iter()
        .find(|available| {
            let available: &str = available;
            available == lang_code || available.starts_with(&format!("{lang_code}-"))
        })
        .map(|lang| lang.to_string())
        .unwrap_or_else(|| "en".to_string())
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
