use clap::Parser;
use lesson_migrate::AppError;
use lesson_migrate::config::Cli;
use lesson_migrate::runtime::{execute, prepare};
use lesson_migrate::system::install_panic_hook;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // 安装 panic hook
    install_panic_hook();

    // 加载 .env（已存在的环境变量优先）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command();

    // 初始化配置与日志
    let ctx = match prepare(&cli) {
        Ok(ctx) => ctx,
        Err(e) => return fail(&e),
    };

    match execute(command, &ctx.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(err: &AppError) -> ExitCode {
    tracing::error!(code = err.code(), "{}", err);
    eprintln!("{}", err.format_colored());
    ExitCode::from(err.exit_code())
}
