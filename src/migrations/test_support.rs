use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::AppError;
use crate::storage::{AppliedMigration, MigrationTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Execute(String),
    EnsureLedger,
    Record(String),
    Close,
}

/// 记录所有调用的内存执行目标
#[derive(Default)]
pub struct RecordingTarget {
    events: Arc<Mutex<Vec<Event>>>,
    fail_on: Option<String>,
    ledger: Vec<AppliedMigration>,
}

impl RecordingTarget {
    /// SQL 包含 `marker` 时执行失败
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn with_ledger(ledger: Vec<AppliedMigration>) -> Self {
        Self {
            ledger,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Arc<Mutex<Vec<Event>>> {
        self.events.clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl MigrationTarget for RecordingTarget {
    async fn execute(&mut self, sql: &str) -> Result<(), sqlx::Error> {
        self.push(Event::Execute(sql.to_string()));
        match &self.fail_on {
            Some(marker) if sql.contains(marker.as_str()) => {
                Err(sqlx::Error::Protocol(format!("syntax error near {}", marker)))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_ledger(&mut self) -> Result<(), AppError> {
        self.push(Event::EnsureLedger);
        Ok(())
    }

    async fn applied_migrations(&mut self) -> Result<Vec<AppliedMigration>, AppError> {
        Ok(self.ledger.clone())
    }

    async fn record_applied(&mut self, id: &str, _checksum: &str) -> Result<(), AppError> {
        self.push(Event::Record(id.to_string()));
        Ok(())
    }

    async fn close(&mut self) -> Result<(), AppError> {
        self.push(Event::Close);
        Ok(())
    }
}
