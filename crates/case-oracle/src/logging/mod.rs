/// Per-test log files with automatic cleanup
pub mod tracing_utils;

/// Global subscriber for command-line runs
mod cli;

/// Panic hook that routes unwinds through `tracing`
mod panic;

pub use cli::init_cli_tracing;
pub use panic::{
    PanicConfig,
    install_panic_hook,
    install_panic_hook_with,
};
pub use tracing_utils::{
    TestTracing,
    TracingConfig,
};
