use sqlx::{AnyConnection, Connection};
use std::time::Duration;
use url::Url;

use crate::config::DatabaseConfig;
use crate::errors::AppError;

/// 连接字符串对应的数据库类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    Postgres,
    Sqlite,
    MySql,
}

impl DatabaseKind {
    /// 根据连接字符串的 scheme 识别数据库类型
    pub fn from_url(database_url: &str) -> Result<Self, AppError> {
        let scheme = database_url
            .split_once(':')
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default();

        match scheme.as_str() {
            "postgres" | "postgresql" => Ok(DatabaseKind::Postgres),
            "sqlite" => Ok(DatabaseKind::Sqlite),
            "mysql" | "mariadb" => Ok(DatabaseKind::MySql),
            _ => Err(AppError::Config(format!(
                "Unsupported database type: {}",
                redact_url(database_url)
            ))),
        }
    }

    /// 第 `index` 个（从 1 开始）绑定参数的占位符
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            DatabaseKind::Postgres => format!("${}", index),
            DatabaseKind::Sqlite | DatabaseKind::MySql => "?".to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DatabaseKind::Postgres => "PostgreSQL",
            DatabaseKind::Sqlite => "SQLite",
            DatabaseKind::MySql => "MySQL",
        }
    }
}

/// 隐藏连接字符串中的密码，用于日志输出
pub fn redact_url(database_url: &str) -> String {
    match Url::parse(database_url) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("****")).is_ok() {
                url.to_string()
            } else {
                "<redacted>".to_string()
            }
        }
        Ok(_) => database_url.to_string(),
        Err(_) => "<unparseable url>".to_string(),
    }
}

/// 打开单个数据库连接（按 scheme 自动选择驱动）
pub async fn connect(
    database_url: &str,
    config: &DatabaseConfig,
) -> Result<(AnyConnection, DatabaseKind), AppError> {
    let kind = DatabaseKind::from_url(database_url)?;
    sqlx::any::install_default_drivers();

    tracing::info!(
        "Connecting to {} database: {}",
        kind.name(),
        redact_url(database_url)
    );

    let timeout = Duration::from_secs(config.connect_timeout_secs);
    let conn = tokio::time::timeout(timeout, AnyConnection::connect(database_url))
        .await
        .map_err(|_| {
            AppError::Connection(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("connection not established within {}s", config.connect_timeout_secs),
            )))
        })?
        .map_err(AppError::Connection)?;

    tracing::info!("Database connected");
    Ok((conn, kind))
}
