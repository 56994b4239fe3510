use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    // 文件系统错误
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // 迁移文件命名不符合约定
    #[error("Invalid migration: {0}")]
    InvalidMigration(String),

    // 数据库错误
    #[error("Failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Migration {file} failed: {source}")]
    Execution {
        file: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Ledger error: {0}")]
    Ledger(#[source] sqlx::Error),

    #[error("Migration {id} was modified after it was applied (recorded {recorded}, current {current})")]
    ChecksumMismatch {
        id: String,
        recorded: String,
        current: String,
    },

    // 通用错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 构造带上下文的 IO 错误
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            context: context.into(),
            source,
        }
    }

    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "E001",
            AppError::Io { .. } => "E002",
            AppError::InvalidMigration(_) => "E003",
            AppError::Connection(_) => "E004",
            AppError::Execution { .. } => "E005",
            AppError::Ledger(_) => "E006",
            AppError::ChecksumMismatch { .. } => "E007",
            AppError::Internal(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Configuration Error",
            AppError::Io { .. } => "I/O Error",
            AppError::InvalidMigration(_) => "Invalid Migration",
            AppError::Connection(_) => "Connection Error",
            AppError::Execution { .. } => "Execution Error",
            AppError::Ledger(_) => "Ledger Error",
            AppError::ChecksumMismatch { .. } => "Checksum Mismatch",
            AppError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// 进程退出码，所有失败统一为 1
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }
}
