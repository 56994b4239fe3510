use serde::Serialize;

use super::connection::DatabaseKind;

/// 已执行迁移记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub id: String,
    pub checksum: String,
    pub applied_at: String,
}

/// 迁移记录表的 SQL
///
/// 表名在配置校验阶段已限定为普通标识符，可以直接拼接
#[derive(Debug, Clone)]
pub struct LedgerQueries {
    table: String,
    kind: DatabaseKind,
}

impl LedgerQueries {
    pub fn new(table: impl Into<String>, kind: DatabaseKind) -> Self {
        Self {
            table: table.into(),
            kind,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    \
                id VARCHAR(255) PRIMARY KEY,\n    \
                checksum VARCHAR(64) NOT NULL,\n    \
                applied_at VARCHAR(64) NOT NULL\n\
            )",
            self.table
        )
    }

    pub fn select_applied_sql(&self) -> String {
        format!(
            "SELECT id, checksum, applied_at FROM {} ORDER BY id",
            self.table
        )
    }

    pub fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (id, checksum, applied_at) VALUES ({}, {}, {})",
            self.table,
            self.kind.placeholder(1),
            self.kind.placeholder(2),
            self.kind.placeholder(3)
        )
    }
}
