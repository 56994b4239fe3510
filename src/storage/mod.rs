pub mod connection;
pub mod ledger;
pub mod target;

#[cfg(test)]
mod target_tests;

pub use connection::{DatabaseKind, connect, redact_url};
pub use ledger::{AppliedMigration, LedgerQueries};
pub use target::{MigrationTarget, SqlxTarget, close_after};
