//! Utilities manipulating `compile_commands.json` compilation databases.

pub mod absolutize;
pub mod cli;
pub mod compilation_database;
pub mod header_entries;
pub mod include_paths;
pub mod merge;
pub mod paths;

/// Set up `env_logger`, showing warnings and errors unless `RUST_LOG` says
/// otherwise.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
