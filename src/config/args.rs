//! 命令行参数解析
//!
//! 命令行参数优先级最高，会覆盖配置文件与环境变量

use clap::{Parser, Subcommand};

use super::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "lesson-migrate", version)]
#[command(about = "Apply ordered SQL migration files to the lesson platform database", long_about = None)]
pub struct Cli {
    /// 配置文件路径（默认 lesson-migrate.toml）
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// 迁移文件目录
    #[arg(short, long, global = true)]
    pub dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Apply every migration file in filename order (default)
    Up {
        /// Read and validate files without connecting or executing anything
        #[arg(long)]
        dry_run: bool,
        /// Record applied migrations and skip the ones already recorded
        #[arg(long)]
        track: bool,
    },
    /// Show applied, pending and modified migrations from the ledger
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Create the next numbered migration file
    New { name: String },
    /// Print a sample configuration file
    SampleConfig,
}

impl Cli {
    /// 未指定子命令时默认执行 up
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Up {
            dry_run: false,
            track: false,
        })
    }

    /// 将命令行参数合并进配置
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.dir {
            config.migrations.dir = dir.clone();
        }
        if let Some(Command::Up { track: true, .. }) = &self.command {
            config.migrations.track_applied = true;
        }
    }
}
