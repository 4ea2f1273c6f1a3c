//! CLI command handlers, one per file.

mod config;
mod replay;
mod set_extension;

pub use config::run_show_config;
pub use replay::run_replay;
pub use set_extension::run_set_extension;
