//! Diagnostic logging setup
//!
//! Standard output carries the engine's responses, so diagnostics never go
//! there. With `logging_enabled` every event at DEBUG and above is appended
//! to the configured log file; otherwise only errors reach standard error.
//! `RUST_LOG` overrides the level in both cases:
//!
//! ```bash
//! RUST_LOG=ucirelay::relay=debug ucirelay
//! ```

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn env_filter(default: &str) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize the tracing subscriber for `config`
pub fn init_tracing(config: &Config) -> io::Result<()> {
	if config.logging_enabled {
		let file = OpenOptions::new().create(true).append(true).open(&config.log_file)?;
		tracing_subscriber::fmt()
			.with_env_filter(env_filter("debug"))
			.with_writer(Mutex::new(file))
			.with_ansi(false)
			.init();
		info!("Logging initialized.");
	} else {
		tracing_subscriber::fmt()
			.with_env_filter(env_filter("error"))
			.with_writer(io::stderr)
			.init();
	}
	Ok(())
}

// vim: ts=4
