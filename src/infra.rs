//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Check Runner,
//! including command execution, the shell-driven fixture provider,
//! file system operations, and i18n support.
//!
//! 此模块为 Check Runner 提供基础设施服务，
//! 包括命令执行、基于 shell 的夹具提供者、文件系统操作和国际化支持。

pub mod command;
pub mod fs;
pub mod shell_fixture;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
