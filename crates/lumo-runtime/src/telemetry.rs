//! Tracing subscriber initialisation for Lumo binaries.
//!
//! Call [`init_tracing`] once at process startup.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `RUST_LOG` | Log filter (default `"info"`). |
//! | `LUMO_LOG_FORMAT=json` | Emit newline-delimited JSON logs. |

use tracing_subscriber::EnvFilter;

/// Initialise the global `tracing` subscriber.
///
/// Reads `RUST_LOG` for the filter (defaulting to `info`) and
/// `LUMO_LOG_FORMAT=json` to switch from the compact console formatter
/// to newline-delimited JSON suitable for log aggregators.
///
/// Calling it a second time (e.g. from multiple tests) is a no-op.
pub fn init_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_level));

    let result = if std::env::var("LUMO_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .try_init()
    };

    // A second init (another test, an embedding process that set its
    // own subscriber) is fine; keep whichever subscriber won.
    let _ = result;
}
