pub mod runner;
pub mod scaffold;
pub mod source;
pub mod status;

#[cfg(test)]
mod test_support;

pub use runner::{MigrationRunner, RunOptions, RunReport};
pub use scaffold::create_migration;
pub use source::{MigrationFile, checksum, discover};
pub use status::{MigrationState, StatusEntry, collect_status, render_table};
