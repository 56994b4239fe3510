use async_trait::async_trait;
use chrono::Utc;
use sqlx::{AnyConnection, Connection, Executor, Row};

use super::connection::{DatabaseKind, connect};
use super::ledger::{AppliedMigration, LedgerQueries};
use crate::config::{DatabaseConfig, MigrationsConfig};
use crate::errors::AppError;

/// 迁移执行目标（一次运行独占的数据库连接）
#[async_trait]
pub trait MigrationTarget: Send {
    /// 将整个文件内容作为一次提交执行
    async fn execute(&mut self, sql: &str) -> Result<(), sqlx::Error>;

    /// 确保迁移记录表存在
    async fn ensure_ledger(&mut self) -> Result<(), AppError>;

    /// 读取已执行的迁移记录
    async fn applied_migrations(&mut self) -> Result<Vec<AppliedMigration>, AppError>;

    /// 写入一条迁移记录
    async fn record_applied(&mut self, id: &str, checksum: &str) -> Result<(), AppError>;

    /// 释放连接
    async fn close(&mut self) -> Result<(), AppError>;
}

/// 释放连接后返回原结果
///
/// 无论 `result` 成功与否都只关闭一次；两者都失败时保留原错误。
pub async fn close_after<T, R>(target: &mut T, result: Result<R, AppError>) -> Result<R, AppError>
where
    T: MigrationTarget + ?Sized,
{
    let closed = target.close().await;
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            tracing::warn!("Failed to close database connection: {}", close_err);
            Err(err)
        }
    }
}

/// 基于 sqlx Any 驱动的执行目标
pub struct SqlxTarget {
    conn: Option<AnyConnection>,
    ledger: LedgerQueries,
}

impl SqlxTarget {
    /// 打开连接
    pub async fn connect(
        database_url: &str,
        database: &DatabaseConfig,
        migrations: &MigrationsConfig,
    ) -> Result<Self, AppError> {
        let (conn, kind) = connect(database_url, database).await?;
        Ok(Self::from_connection(conn, kind, &migrations.ledger_table))
    }

    pub fn from_connection(conn: AnyConnection, kind: DatabaseKind, ledger_table: &str) -> Self {
        Self {
            conn: Some(conn),
            ledger: LedgerQueries::new(ledger_table, kind),
        }
    }

    fn conn(&mut self) -> Result<&mut AnyConnection, sqlx::Error> {
        self.conn
            .as_mut()
            .ok_or_else(|| sqlx::Error::Protocol("database connection already closed".into()))
    }
}

#[async_trait]
impl MigrationTarget for SqlxTarget {
    async fn execute(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        let conn = self.conn()?;
        conn.execute(sql).await?;
        Ok(())
    }

    async fn ensure_ledger(&mut self) -> Result<(), AppError> {
        let sql = self.ledger.create_table_sql();
        let conn = self.conn().map_err(AppError::Ledger)?;
        conn.execute(sql.as_str()).await.map_err(AppError::Ledger)?;
        tracing::debug!("Ledger table {} ready", self.ledger.table());
        Ok(())
    }

    async fn applied_migrations(&mut self) -> Result<Vec<AppliedMigration>, AppError> {
        let sql = self.ledger.select_applied_sql();
        let conn = self.conn().map_err(AppError::Ledger)?;
        let rows = sqlx::query(&sql)
            .fetch_all(conn)
            .await
            .map_err(AppError::Ledger)?;

        rows.iter()
            .map(|row| {
                Ok(AppliedMigration {
                    id: row.try_get("id").map_err(AppError::Ledger)?,
                    checksum: row.try_get("checksum").map_err(AppError::Ledger)?,
                    applied_at: row.try_get("applied_at").map_err(AppError::Ledger)?,
                })
            })
            .collect()
    }

    async fn record_applied(&mut self, id: &str, checksum: &str) -> Result<(), AppError> {
        let sql = self.ledger.insert_sql();
        let applied_at = Utc::now().to_rfc3339();
        let conn = self.conn().map_err(AppError::Ledger)?;
        sqlx::query(&sql)
            .bind(id.to_string())
            .bind(checksum.to_string())
            .bind(applied_at)
            .execute(conn)
            .await
            .map_err(AppError::Ledger)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), AppError> {
        match self.conn.take() {
            Some(conn) => {
                conn.close().await.map_err(AppError::Connection)?;
                tracing::debug!("Database connection closed");
                Ok(())
            }
            None => Ok(()),
        }
    }
}
