use std::collections::HashMap;

use serde::Serialize;

use super::source::{MigrationFile, checksum};
use crate::errors::AppError;
use crate::storage::MigrationTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationState {
    Applied,
    Pending,
    /// 已执行但文件内容已改变
    Modified,
    Empty,
    /// 记录表中存在但文件已删除
    Missing,
}

impl MigrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationState::Applied => "applied",
            MigrationState::Pending => "pending",
            MigrationState::Modified => "modified",
            MigrationState::Empty => "empty",
            MigrationState::Missing => "missing",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    pub id: String,
    pub state: MigrationState,
    pub applied_at: Option<String>,
}

/// 对比迁移文件与记录表，得到每个迁移的状态
pub async fn collect_status<T>(
    migrations: &[MigrationFile],
    target: &mut T,
) -> Result<Vec<StatusEntry>, AppError>
where
    T: MigrationTarget + ?Sized,
{
    target.ensure_ledger().await?;
    let mut recorded: HashMap<String, _> = target
        .applied_migrations()
        .await?
        .into_iter()
        .map(|m| (m.id.clone(), m))
        .collect();

    let mut entries = Vec::with_capacity(migrations.len());
    for migration in migrations {
        let sql = migration.read().await?;
        let applied = recorded.remove(&migration.id);

        let state = match &applied {
            Some(record) if record.checksum == checksum(&sql) => MigrationState::Applied,
            Some(_) => MigrationState::Modified,
            None if sql.trim().is_empty() => MigrationState::Empty,
            None => MigrationState::Pending,
        };

        entries.push(StatusEntry {
            id: migration.id.clone(),
            state,
            applied_at: applied.map(|record| record.applied_at),
        });
    }

    let mut missing: Vec<_> = recorded.into_values().collect();
    missing.sort_by(|a, b| a.id.cmp(&b.id));
    entries.extend(missing.into_iter().map(|record| StatusEntry {
        id: record.id,
        state: MigrationState::Missing,
        applied_at: Some(record.applied_at),
    }));

    Ok(entries)
}

/// 渲染为终端表格
pub fn render_table(entries: &[StatusEntry]) -> String {
    use colored::Colorize;

    let width = entries
        .iter()
        .map(|e| e.id.len())
        .max()
        .unwrap_or(0)
        .max("MIGRATION".len());

    let mut out = format!("{:<width$}  {:<8}  APPLIED AT\n", "MIGRATION", "STATE", width = width);
    for entry in entries {
        let state = format!("{:<8}", entry.state.as_str());
        let state = match entry.state {
            MigrationState::Applied => state.green(),
            MigrationState::Pending => state.yellow(),
            MigrationState::Empty => state.dimmed(),
            MigrationState::Modified | MigrationState::Missing => state.red(),
        };
        out.push_str(&format!(
            "{:<width$}  {}  {}\n",
            entry.id,
            state,
            entry.applied_at.as_deref().unwrap_or("-"),
            width = width
        ));
    }
    out
}
