//! 迁移文件发现与命名校验
//!
//! 执行顺序完全由文件名的字典序决定。严格模式下要求文件名形如
//! `<数字前缀>-<名称>.sql`，且所有前缀位宽一致、互不重复，
//! 这样字典序与数字顺序才一致。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::errors::AppError;

static MIGRATION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)[-_]([A-Za-z0-9][A-Za-z0-9._-]*)\.sql$").expect("valid migration name regex")
});

/// 单个迁移文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// 去掉 `.sql` 后缀的文件名，作为记录表主键
    pub id: String,
    pub file_name: String,
    pub path: PathBuf,
    /// 数字前缀（保留前导零）
    pub version: Option<String>,
    pub name: Option<String>,
}

impl MigrationFile {
    fn from_file_name(dir: &Path, file_name: &str) -> Self {
        let id = file_name.strip_suffix(".sql").unwrap_or(file_name).to_string();
        let (version, name) = match MIGRATION_NAME.captures(file_name) {
            Some(caps) => (
                caps.get(1).map(|m| m.as_str().to_string()),
                caps.get(2).map(|m| m.as_str().to_string()),
            ),
            None => (None, None),
        };

        Self {
            id,
            file_name: file_name.to_string(),
            path: dir.join(file_name),
            version,
            name,
        }
    }

    /// 读取完整文件内容（UTF-8）
    pub async fn read(&self) -> Result<String, AppError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::io(
                format!("Failed to read migration file {}", self.path.display()),
                e,
            )
        })
    }
}

/// 文件内容的 SHA-256 十六进制摘要
pub fn checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

/// 列出目录中的迁移文件，按文件名字典序升序排列
///
/// 只接受以 `.sql` 结尾的普通文件，其余条目忽略。
pub async fn discover(dir: &Path, strict: bool) -> Result<Vec<MigrationFile>, AppError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        AppError::io(
            format!("Failed to read migrations directory {}", dir.display()),
            e,
        )
    })?;

    let mut migrations = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        AppError::io(
            format!("Failed to read directory entry in {}", dir.display()),
            e,
        )
    })? {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "sql") {
            continue;
        }

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| AppError::io(format!("Failed to stat {}", path.display()), e))?;
        if !metadata.is_file() {
            tracing::debug!("Ignoring non-file entry {}", path.display());
            continue;
        }

        let file_name = entry.file_name().into_string().map_err(|raw| {
            AppError::InvalidMigration(format!("Migration filename is not valid UTF-8: {:?}", raw))
        })?;
        migrations.push(MigrationFile::from_file_name(dir, &file_name));
    }

    migrations.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    if strict {
        validate_names(&migrations)?;
    }

    Ok(migrations)
}

/// 校验命名约定，一次性报告所有问题
pub fn validate_names(migrations: &[MigrationFile]) -> Result<(), AppError> {
    let mut problems = Vec::new();
    let mut widths: HashMap<usize, Vec<&str>> = HashMap::new();
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for migration in migrations {
        let Some(version) = migration.version.as_deref() else {
            problems.push(format!(
                "{} does not match <number>-<name>.sql",
                migration.file_name
            ));
            continue;
        };

        widths
            .entry(version.len())
            .or_default()
            .push(&migration.file_name);

        if let Some(previous) = seen.insert(version, &migration.file_name) {
            problems.push(format!(
                "{} and {} share prefix {}",
                previous, migration.file_name, version
            ));
        }
    }

    if widths.len() > 1 {
        let mut found: Vec<_> = widths.iter().collect();
        found.sort_by_key(|(width, _)| **width);
        let summary = found
            .iter()
            .map(|(width, files)| format!("{} digits ({})", width, files[0]))
            .collect::<Vec<_>>()
            .join(", ");
        problems.push(format!(
            "numeric prefixes have mixed widths: {}; zero-pad them so filename order matches numeric order",
            summary
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidMigration(problems.join("; ")))
    }
}
