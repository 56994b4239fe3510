use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;

use super::source::discover;
use crate::errors::AppError;

const DEFAULT_PREFIX_WIDTH: usize = 3;

/// 将迁移名称转换为文件名片段：小写，非字母数字折叠为 `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// 计算下一个数字前缀，沿用已有前缀的位宽
fn next_prefix(versions: &[&str]) -> Result<String, AppError> {
    let width = versions
        .iter()
        .map(|v| v.len())
        .max()
        .unwrap_or(DEFAULT_PREFIX_WIDTH);

    let mut highest = 0u64;
    for version in versions {
        let value: u64 = version.parse().map_err(|_| {
            AppError::InvalidMigration(format!("Migration prefix {} is not a number", version))
        })?;
        highest = highest.max(value);
    }

    let next = highest.checked_add(1).ok_or_else(|| {
        AppError::InvalidMigration(format!("Migration prefix {} cannot be incremented", highest))
    })?;
    let next = format!("{:0width$}", next, width = width);
    if next.len() > width {
        return Err(AppError::InvalidMigration(format!(
            "Next prefix {} does not fit the existing {}-digit prefixes; widen the existing filenames first",
            next, width
        )));
    }
    Ok(next)
}

/// 在迁移目录中创建下一个编号的空迁移文件
pub async fn create_migration(dir: &Path, name: &str) -> Result<PathBuf, AppError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::Config(format!(
            "Migration name must contain letters or digits: {:?}",
            name
        )));
    }

    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        AppError::io(
            format!("Failed to create migrations directory {}", dir.display()),
            e,
        )
    })?;

    let existing = discover(dir, false).await?;
    let versions: Vec<&str> = existing.iter().filter_map(|m| m.version.as_deref()).collect();
    let prefix = next_prefix(&versions)?;

    let file_name = format!("{}-{}.sql", prefix, slug);
    let path = dir.join(&file_name);
    let header = format!(
        "-- Migration: {}\n-- Created: {}\n\n",
        name.trim(),
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .map_err(|e| AppError::io(format!("Failed to create {}", path.display()), e))?;
    file.write_all(header.as_bytes())
        .await
        .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;
    file.flush()
        .await
        .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;

    tracing::info!("Created migration {}", path.display());
    Ok(path)
}
