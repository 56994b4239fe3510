//! Panic handler module
//!
//! 迁移过程中发生 panic 时:
//! - 在终端打印彩色报告，提示已执行的迁移不会回滚
//! - 追加写入 crash.log

use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;

const CRASH_LOG: &str = "crash.log";

/// 安装自定义 panic hook
pub fn install_panic_hook() {
    panic::set_hook(Box::new(move |panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        let backtrace = std::backtrace::Backtrace::force_capture();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let args = std::env::args().collect::<Vec<_>>().join(" ");

        if let Err(e) = write_crash_log(&timestamp, &args, &message, &location, &backtrace) {
            eprintln!("Failed to write crash log: {}", e);
        }

        display_panic(&message, &location);
    }));
}

/// 在终端显示 panic 摘要，完整堆栈只写入 crash.log
fn display_panic(message: &str, location: &str) {
    use colored::Colorize;

    let rule = "═══════════════════════════════════════════════════";
    eprintln!();
    eprintln!("{}", rule.red().bold());
    eprintln!("{}", "PANIC".red().bold());
    eprintln!("{}", rule.red().bold());
    eprintln!("{} {}", "原因:".yellow().bold(), message.white());
    eprintln!("{} {}", "位置:".yellow().bold(), location.white());
    eprintln!(
        "{}",
        "已执行的迁移不会回滚，请根据日志确认最后一个成功的文件".yellow()
    );
    eprintln!("{}", format!("详细信息已保存到 {}", CRASH_LOG).cyan());
    eprintln!("{}", rule.red().bold());
    eprintln!();
}

/// 写入崩溃日志
fn write_crash_log(
    timestamp: &str,
    args: &str,
    message: &str,
    location: &str,
    backtrace: &std::backtrace::Backtrace,
) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(CRASH_LOG)?;

    writeln!(file, "==========================================")?;
    writeln!(file, "lesson-migrate {} crash - {}", env!("CARGO_PKG_VERSION"), timestamp)?;
    writeln!(file, "==========================================")?;
    writeln!(file, "Command: {}", args)?;
    writeln!(file, "Message: {}", message)?;
    writeln!(file, "Location: {}", location)?;
    writeln!(file, "\nBacktrace:")?;
    writeln!(file, "{:?}", backtrace)?;
    writeln!(file, "==========================================\n")?;

    Ok(())
}
