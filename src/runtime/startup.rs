use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{AppConfig, Cli};
use crate::errors::AppError;

/// 启动上下文
pub struct StartupContext {
    pub config: AppConfig,
    _log_guard: Option<WorkerGuard>,
}

/// 加载配置并初始化日志
///
/// 配置优先级：命令行 > 环境变量 > 配置文件 > 默认值
pub fn prepare(cli: &Cli) -> Result<StartupContext, AppError> {
    // 1. 加载配置
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    // 2. 验证配置
    config.validate()?;

    // 3. 初始化日志
    let log_guard = crate::system::init_logging(&config.log)?;
    tracing::debug!("lesson-migrate v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        dir = %config.migrations.dir,
        strict_names = config.migrations.strict_names,
        track_applied = config.migrations.track_applied,
        "Configuration loaded"
    );

    Ok(StartupContext {
        config,
        _log_guard: log_guard,
    })
}
