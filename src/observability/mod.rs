//! Logging setup and crash reporting for the `studioplan` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary via [`init_tracing`].

pub mod panic_hook;

pub use panic_hook::{install_panic_hook, set_data_source, DataSourceGuard};

use tracing_subscriber::EnvFilter;

/// Map the `-v` count to a default filter directive.
pub fn verbosity_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber, writing to stderr so report output on
/// stdout stays clean. `RUST_LOG` wins over the verbosity flag.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("studioplan={}", verbosity_directive(verbosity))));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
