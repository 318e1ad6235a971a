//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the file writes used by the report renderers and the
//! `init` command.
//!
//! 此模块提供报告渲染器和 `init` 命令所使用的文件写入功能。

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes `contents` to `path`, replacing any existing file.
///
/// The data goes to a temporary file in the target's directory first and is
/// then persisted over the target, so readers never observe a half-written
/// report. The target directory must already exist; the underlying
/// `std::io::Error` is kept as the error's source.
///
/// 将 `contents` 写入 `path`，替换已有文件。
/// 数据先写入目标目录中的临时文件，然后再覆盖目标文件，因此读者不会看到写了一半的报告。
/// 目标目录必须已经存在；底层的 `std::io::Error` 会作为错误来源保留。
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = parent_dir(path);

    let mut temp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    temp.write_all(contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    temp.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Creates the parent directories of `path` if they are missing.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    let dir = parent_dir(path);
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Resolves `path` against `base` unless it is already absolute.
/// 除非 `path` 已是绝对路径，否则将其相对于 `base` 解析。
pub fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
