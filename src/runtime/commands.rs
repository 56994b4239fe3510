use std::path::Path;

use colored::Colorize;

use crate::config::{AppConfig, Command};
use crate::errors::AppError;
use crate::migrations::{
    MigrationRunner, RunOptions, RunReport, collect_status, create_migration, discover,
    render_table,
};
use crate::storage::{SqlxTarget, close_after};

/// 执行子命令
pub async fn execute(command: Command, config: &AppConfig) -> Result<(), AppError> {
    match command {
        Command::Up { dry_run, .. } => {
            let report = run_up(config, dry_run).await?;
            println!("{}", summary(&report));
        }
        Command::Status { json } => {
            let entries = {
                let url = config.database_url()?;
                let migrations = discover(
                    Path::new(&config.migrations.dir),
                    config.migrations.strict_names,
                )
                .await?;
                let mut target =
                    SqlxTarget::connect(url, &config.database, &config.migrations).await?;
                let result = collect_status(&migrations, &mut target).await;
                close_after(&mut target, result).await?
            };

            if json {
                let output = serde_json::to_string_pretty(&entries)
                    .map_err(|e| AppError::Internal(format!("Failed to serialize status: {}", e)))?;
                println!("{}", output);
            } else {
                print!("{}", render_table(&entries));
            }
        }
        Command::New { name } => {
            let path = create_migration(Path::new(&config.migrations.dir), &name).await?;
            println!("{} {}", "Created".green().bold(), path.display());
        }
        Command::SampleConfig => {
            print!("{}", AppConfig::generate_sample_config());
        }
    }

    Ok(())
}

/// 应用迁移目录中的全部迁移
///
/// 连接字符串在任何文件读取之前检查；演练模式不需要连接字符串。
pub async fn run_up(config: &AppConfig, dry_run: bool) -> Result<RunReport, AppError> {
    let database_url = if dry_run {
        None
    } else {
        Some(config.database_url()?)
    };

    let dir = Path::new(&config.migrations.dir);
    let migrations = discover(dir, config.migrations.strict_names).await?;
    tracing::info!(
        "Found {} migration file(s) in {}",
        migrations.len(),
        dir.display()
    );

    let runner = MigrationRunner::new(
        migrations,
        RunOptions {
            track_applied: config.migrations.track_applied,
        },
    );

    match database_url {
        None => runner.preview().await,
        Some(url) => {
            let target = SqlxTarget::connect(url, &config.database, &config.migrations).await?;
            runner.run(target).await
        }
    }
}

/// 最终状态行
fn summary(report: &RunReport) -> String {
    let mut skipped = Vec::new();
    if !report.skipped_empty.is_empty() {
        skipped.push(format!("{} empty", report.skipped_empty.len()));
    }
    if !report.skipped_applied.is_empty() {
        skipped.push(format!("{} already applied", report.skipped_applied.len()));
    }
    let skipped = if skipped.is_empty() {
        String::new()
    } else {
        format!(", skipped {}", skipped.join(", "))
    };

    if report.dry_run {
        format!(
            "{} {} migration(s) would be applied{}",
            "Dry run:".cyan().bold(),
            report.applied.len(),
            skipped
        )
    } else {
        format!(
            "{} Applied {} migration(s){} in {} ms",
            "✓".green().bold(),
            report.applied.len(),
            skipped,
            report.elapsed_ms
        )
    }
}
