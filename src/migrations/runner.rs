//! 迁移执行器
//!
//! 按文件名顺序逐个执行迁移文件，每个文件作为一次提交，
//! 等待数据库确认后才读取下一个文件。任何错误都立即终止运行，
//! 已执行的文件不会回滚。

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

use super::source::{MigrationFile, checksum};
use crate::errors::AppError;
use crate::storage::{AppliedMigration, MigrationTarget, close_after};

/// 执行选项
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// 使用记录表跳过已执行的迁移
    pub track_applied: bool,
}

/// 运行结果
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub applied: Vec<String>,
    pub skipped_empty: Vec<String>,
    pub skipped_applied: Vec<String>,
    pub dry_run: bool,
    pub elapsed_ms: u128,
}

pub struct MigrationRunner {
    migrations: Vec<MigrationFile>,
    options: RunOptions,
}

impl MigrationRunner {
    pub fn new(migrations: Vec<MigrationFile>, options: RunOptions) -> Self {
        Self {
            migrations,
            options,
        }
    }

    /// 演练：读取所有文件并列出将要执行的迁移，不连接数据库
    pub async fn preview(&self) -> Result<RunReport, AppError> {
        let start_time = Instant::now();
        let mut report = RunReport {
            dry_run: true,
            ..RunReport::default()
        };

        for migration in &self.migrations {
            let sql = migration.read().await?;
            if sql.trim().is_empty() {
                tracing::info!("Would skip empty migration {}", migration.file_name);
                report.skipped_empty.push(migration.id.clone());
                continue;
            }
            println!("Would apply {}", migration.file_name);
            report.applied.push(migration.id.clone());
        }

        report.elapsed_ms = start_time.elapsed().as_millis();
        Ok(report)
    }

    /// 执行全部迁移，结束后（无论成功失败）关闭连接一次
    pub async fn run<T>(&self, mut target: T) -> Result<RunReport, AppError>
    where
        T: MigrationTarget,
    {
        let result = self.apply(&mut target).await;
        close_after(&mut target, result).await
    }

    /// 在已打开的连接上执行全部迁移，不负责关闭连接
    pub async fn apply<T>(&self, target: &mut T) -> Result<RunReport, AppError>
    where
        T: MigrationTarget + ?Sized,
    {
        let start_time = Instant::now();
        let mut report = RunReport::default();

        let recorded: HashMap<String, AppliedMigration> = if self.options.track_applied {
            target.ensure_ledger().await?;
            target
                .applied_migrations()
                .await?
                .into_iter()
                .map(|m| (m.id.clone(), m))
                .collect()
        } else {
            HashMap::new()
        };

        for migration in &self.migrations {
            let sql = migration.read().await?;
            let sum = checksum(&sql);

            // 已记录的文件即使被清空也要比对校验和
            if let Some(applied) = recorded.get(&migration.id) {
                if applied.checksum != sum {
                    return Err(AppError::ChecksumMismatch {
                        id: migration.id.clone(),
                        recorded: applied.checksum.clone(),
                        current: sum,
                    });
                }
                tracing::debug!("Already applied {}", migration.file_name);
                report.skipped_applied.push(migration.id.clone());
                continue;
            }

            if sql.trim().is_empty() {
                tracing::info!("Skipping empty migration {}", migration.file_name);
                report.skipped_empty.push(migration.id.clone());
                continue;
            }

            println!("Executing {}", migration.file_name);
            let started = Instant::now();
            target
                .execute(&sql)
                .await
                .map_err(|source| AppError::Execution {
                    file: migration.file_name.clone(),
                    source,
                })?;

            if self.options.track_applied {
                target.record_applied(&migration.id, &sum).await?;
            }

            tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Applied {}",
                migration.file_name
            );
            report.applied.push(migration.id.clone());
        }

        report.elapsed_ms = start_time.elapsed().as_millis();
        Ok(report)
    }
}
