//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Check Runner:
//! the result models, the result recorder, the harness, fixture scoping,
//! suite configuration and declaratively configured checks.
//!
//! 此模块包含 Check Runner 的核心功能：
//! 结果模型、结果记录器、执行器、夹具作用域、套件配置以及声明式检查。

pub mod config;
pub mod context;
pub mod declarative;
pub mod fixture;
pub mod harness;
pub mod models;
pub mod recorder;

// Re-exports
pub use models::CheckResult;
pub use config::CheckSuite;
pub use harness::Harness;
