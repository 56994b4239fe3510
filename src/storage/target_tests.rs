#[cfg(test)]
mod tests {
    use crate::config::{DatabaseConfig, MigrationsConfig};
    use crate::errors::AppError;
    use crate::migrations::{MigrationRunner, RunOptions, discover};
    use crate::storage::{MigrationTarget, SqlxTarget};
    use sqlx::{AnyConnection, Connection, Row};
    use std::fs;
    use std::path::Path;

    /// 创建测试用的 SQLite 文件数据库连接字符串
    fn sqlite_url(dir: &Path) -> String {
        format!("sqlite://{}?mode=rwc", dir.join("lessons.db").display())
    }

    /// 打开测试用执行目标
    async fn open_target(url: &str) -> SqlxTarget {
        SqlxTarget::connect(url, &DatabaseConfig::default(), &MigrationsConfig::default())
            .await
            .expect("Failed to open test database")
    }

    async fn count_rows(url: &str, table: &str) -> i64 {
        sqlx::any::install_default_drivers();
        let mut conn = AnyConnection::connect(url).await.unwrap();
        let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {}", table))
            .fetch_one(&mut conn)
            .await
            .unwrap();
        let n: i64 = row.try_get("n").unwrap();
        conn.close().await.unwrap();
        n
    }

    #[tokio::test]
    async fn test_multi_statement_file_runs_as_one_submission() {
        let dir = tempfile::tempdir().unwrap();
        let sql_dir = dir.path().join("migrations");
        fs::create_dir(&sql_dir).unwrap();
        fs::write(
            sql_dir.join("001-init.sql"),
            "CREATE TABLE lessons (id INTEGER PRIMARY KEY, slug TEXT NOT NULL);\n\
             INSERT INTO lessons (slug) VALUES ('intro');\n\
             INSERT INTO lessons (slug) VALUES ('variables');\n",
        )
        .unwrap();
        fs::write(
            sql_dir.join("002-profiles.sql"),
            "CREATE TABLE profiles (id INTEGER PRIMARY KEY, name TEXT);",
        )
        .unwrap();

        let url = sqlite_url(dir.path());
        let runner = MigrationRunner::new(discover(&sql_dir, true).await.unwrap(), RunOptions::default());
        let report = runner.run(open_target(&url).await).await.unwrap();

        assert_eq!(report.applied, vec!["001-init", "002-profiles"]);
        assert_eq!(count_rows(&url, "lessons").await, 2);
        assert_eq!(count_rows(&url, "profiles").await, 0);
    }

    #[tokio::test]
    async fn test_ledger_makes_reruns_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let sql_dir = dir.path().join("migrations");
        fs::create_dir(&sql_dir).unwrap();
        fs::write(
            sql_dir.join("001-init.sql"),
            "CREATE TABLE lessons (id INTEGER PRIMARY KEY);\nINSERT INTO lessons DEFAULT VALUES;",
        )
        .unwrap();

        let url = sqlite_url(dir.path());
        let options = RunOptions { track_applied: true };

        let runner = MigrationRunner::new(discover(&sql_dir, true).await.unwrap(), options);
        let first = runner.run(open_target(&url).await).await.unwrap();
        assert_eq!(first.applied, vec!["001-init"]);

        fs::write(
            sql_dir.join("002-more.sql"),
            "INSERT INTO lessons DEFAULT VALUES;",
        )
        .unwrap();
        let runner = MigrationRunner::new(discover(&sql_dir, true).await.unwrap(), options);
        let second = runner.run(open_target(&url).await).await.unwrap();
        assert_eq!(second.applied, vec!["002-more"]);
        assert_eq!(second.skipped_applied, vec!["001-init"]);

        // 两次运行共插入两行，没有重复执行 001
        assert_eq!(count_rows(&url, "lessons").await, 2);
        assert_eq!(count_rows(&url, "_lesson_migrations").await, 2);
    }

    #[tokio::test]
    async fn test_failure_stops_run_and_keeps_earlier_records() {
        let dir = tempfile::tempdir().unwrap();
        let sql_dir = dir.path().join("migrations");
        fs::create_dir(&sql_dir).unwrap();
        fs::write(sql_dir.join("001-init.sql"), "CREATE TABLE lessons (id INTEGER);").unwrap();
        fs::write(sql_dir.join("002-broken.sql"), "CREATE TABEL oops (id INTEGER);").unwrap();
        fs::write(sql_dir.join("003-profiles.sql"), "CREATE TABLE profiles (id INTEGER);").unwrap();

        let url = sqlite_url(dir.path());
        let runner = MigrationRunner::new(
            discover(&sql_dir, true).await.unwrap(),
            RunOptions { track_applied: true },
        );

        let mut target = open_target(&url).await;
        let err = runner.apply(&mut target).await.unwrap_err();
        assert!(matches!(err, AppError::Execution { ref file, .. } if file == "002-broken.sql"));

        let applied = target.applied_migrations().await.unwrap();
        let ids: Vec<_> = applied.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["001-init"]);
        assert_eq!(applied[0].checksum.len(), 64);

        let missing = target
            .execute("SELECT id FROM profiles")
            .await
            .unwrap_err();
        assert!(missing.to_string().contains("no such table"));

        target.close().await.unwrap();
        // 重复关闭不会再次触发
        target.close().await.unwrap();
        assert!(target.execute("SELECT 1").await.is_err());
    }
}
