pub mod config;
pub mod logging;

// Plugin core
pub mod bindings;
pub mod deferred;
pub mod eligibility;
pub mod host;
pub mod lookup;
pub mod memory_host;
pub mod orchestrator;
pub mod plugin;
