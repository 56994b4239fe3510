use serde::{Deserialize, Serialize};

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub migrations: MigrationsConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 连接字符串，通常来自 DATABASE_URL
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// 迁移配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationsConfig {
    #[serde(default = "default_migrations_dir")]
    pub dir: String,
    /// 严格校验文件名前缀（位宽一致、不重复）
    #[serde(default = "default_strict_names")]
    pub strict_names: bool,
    /// 记录已执行的迁移，重复运行时跳过
    #[serde(default)]
    pub track_applied: bool,
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
}

// ============ Default Functions ============

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_strict_names() -> bool {
    true
}

fn default_ledger_table() -> String {
    "_lesson_migrations".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

// ============ Default Trait Implementations ============

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            dir: default_migrations_dir(),
            strict_names: default_strict_names(),
            track_applied: false,
            ledger_table: default_ledger_table(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}
