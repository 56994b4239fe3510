pub mod commands;
pub mod startup;

pub use commands::execute;
pub use startup::{StartupContext, prepare};
