pub mod args;
mod r#impl;
pub mod structs;

pub use args::{Cli, Command};
pub use r#impl::DEFAULT_CONFIG_FILE;
pub use structs::{AppConfig, DatabaseConfig, LogConfig, MigrationsConfig};
