//! Panic hook installation
//!
//! Routines may unwind with a [`Raised`] payload to report a signal. Those
//! unwinds are domain outcomes, so they are logged at debug level and never
//! reach the default hook. Every other panic is logged as an error.

use std::sync::Once;

use serde::{
    Deserialize,
    Serialize,
};

use crate::outcome::Raised;

static PANIC_HOOK_INIT: Once = Once::new();

fn default_true() -> bool {
    true
}

/// Configuration for panic message logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanicConfig {
    /// Log foreign panics through `tracing`
    #[serde(default = "default_true")]
    pub show: bool,
    /// Also write foreign panics to stderr
    #[serde(default)]
    pub show_stderr: bool,
    /// Call the previously installed hook for foreign panics
    #[serde(default = "default_true")]
    pub show_default_hook: bool,
}

impl Default for PanicConfig {
    fn default() -> Self {
        Self {
            show: true,
            show_stderr: false,
            show_default_hook: true,
        }
    }
}

pub fn install_panic_hook() {
    install_panic_hook_with(PanicConfig::default())
}

/// Install the hook. Only the first call in a process has any effect.
pub fn install_panic_hook_with(config: PanicConfig) {
    PANIC_HOOK_INIT.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            if let Some(raised) = panic_info.payload().downcast_ref::<Raised>() {
                tracing::debug!(
                    signal = ?raised.kind,
                    detail = %raised.detail,
                    "signal raised by unwinding"
                );
                return;
            }
            if config.show {
                tracing::error!("PANIC: {}", panic_info);
            }
            if config.show_stderr {
                eprintln!("\nPANIC: {}", panic_info);
            }
            if config.show_default_hook {
                default_hook(panic_info);
            }
        }));
    });
}
