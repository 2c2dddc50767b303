//! Logging utilities and structured logging support
//!
//! The engine only talks to the `log` facade. Binaries call [`init`] once at
//! startup; `RUST_LOG` selects the verbosity (`trace` shows per-frame detail).

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Defaults to `info` when `RUST_LOG` is unset. Calling it a second time is
/// harmless: the later initialisation is ignored.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
