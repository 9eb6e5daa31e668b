//! Tracing subscriber setup
//!
//! `RUST_LOG` controls the filter; `LOG_FORMAT=json` switches to structured
//! output for log shippers, anything else keeps the human-readable format.

use tracing_subscriber::EnvFilter;

pub fn init_telemetry() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.to_lowercase() == "json")
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
